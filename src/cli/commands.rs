use crate::app::{AppContext, InletError, Result};
use crate::domain::{ActionKind, Bucket, Category, ItemStatus, Source, SourceKind};
use crate::normalizer::slugify;
use crate::refresh::RefreshStatus;
use crate::settings::ReadingMode;
use crate::store::{ItemFilter, OrderBy, Store};

pub async fn add_source(
    ctx: &AppContext,
    url: &str,
    discover: bool,
    name: Option<String>,
    category: Option<String>,
    kind: Option<String>,
) -> Result<()> {
    let (feed_url, discovered_title) = if discover {
        let found = ctx.discovery.discover(url).await?;
        println!("Discovered feed: {}", found.url);
        (found.url, found.title)
    } else {
        (url.to_string(), None)
    };

    let display_name = name
        .or(discovered_title)
        .or_else(|| url::Url::parse(&feed_url).ok()?.host_str().map(String::from))
        .unwrap_or_else(|| feed_url.clone());
    let id = slugify(&display_name);

    if let Some(existing) = ctx.store.get_source(&id)? {
        println!("Source already exists: {} ({})", existing.id, existing.url);
        return Ok(());
    }

    let mut source = Source::new(id.clone(), display_name, feed_url.clone());
    if let Some(k) = kind {
        source.kind = SourceKind::parse(&k);
    }
    if let Some(c) = category {
        source.category = Category::parse(&c);
    }
    ctx.store.upsert_source(&source)?;
    println!("Added source: {} ({})", source.id, source.url);

    // Pull items right away so the source isn't empty until the next cycle.
    match ctx.refresher.fetch_single(&source).await {
        Ok(items) => {
            let count = ctx.store.upsert_items(&items)?;
            println!("Fetched {} new items", count);
        }
        Err(e) => eprintln!("Initial fetch failed (will retry on refresh): {}", e),
    }

    Ok(())
}

pub fn set_enabled(ctx: &AppContext, id: &str, enabled: bool) -> Result<()> {
    ctx.store.set_source_enabled(id, enabled)?;
    println!(
        "{} source: {}",
        if enabled { "Enabled" } else { "Disabled" },
        id
    );
    Ok(())
}

pub fn list_sources(ctx: &AppContext) -> Result<()> {
    let sources = ctx.store.get_all_sources()?;
    if sources.is_empty() {
        println!("No sources");
        return Ok(());
    }

    for source in sources {
        let flag = if source.enabled { " " } else { "✗" };
        println!(
            "{} {:<24} {:<10} {:<6} {}",
            flag,
            source.id,
            source.category.as_str(),
            source.kind.as_str(),
            source.url
        );
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn list_items(
    ctx: &AppContext,
    view: Option<String>,
    status: Option<String>,
    source: Option<String>,
    category: Option<String>,
    min_score: Option<f64>,
    order: Option<String>,
    limit: Option<u32>,
    offset: u32,
) -> Result<()> {
    let mut filter = ItemFilter {
        source_id: source,
        min_score,
        limit,
        offset,
        ..ItemFilter::default()
    };

    // A saved view seeds the filter; explicit flags override it below.
    if let Some(name) = view {
        let saved = ctx
            .settings
            .saved_views
            .get(&name)
            .ok_or_else(|| InletError::Config(format!("No saved view named: {}", name)))?;
        filter.statuses = saved
            .statuses
            .iter()
            .filter_map(|s| ItemStatus::parse(s))
            .collect();
        filter.category = saved.category.as_deref().map(Category::parse);
        if filter.min_score.is_none() {
            filter.min_score = saved.min_score;
        }
    }

    if let Some(s) = status {
        let status = ItemStatus::parse(&s)
            .ok_or_else(|| InletError::Config(format!("Unknown status: {}", s)))?;
        filter.statuses = vec![status];
    }
    if let Some(c) = category {
        filter.category = Some(Category::parse(&c));
    }
    if let Some(o) = order {
        filter.order = match o.to_lowercase().as_str() {
            "published" => OrderBy::Published,
            "fetched" => OrderBy::Fetched,
            "score" => OrderBy::Score,
            other => {
                return Err(InletError::Config(format!("Unknown order: {}", other)));
            }
        };
    }

    let items = ctx.store.get_items(&filter)?;
    if items.is_empty() {
        println!("No items");
        return Ok(());
    }

    for item in items {
        let marker = match item.status {
            ItemStatus::Unread => "●",
            _ => " ",
        };
        let date = item
            .published_at
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "          ".to_string());
        println!(
            "{} {} [{:>5.1}] {:<8} {}",
            marker,
            date,
            item.score,
            item.bucket().as_str(),
            item.title
        );
        println!("    {}", item.url);
        if ctx.settings.reading_mode == ReadingMode::Full {
            let content = item.display_content();
            if !content.trim().is_empty() {
                let snippet: String = content.chars().take(200).collect();
                println!("    {}", snippet.replace('\n', " "));
            }
        }
    }
    Ok(())
}

pub async fn refresh(ctx: &AppContext) -> Result<()> {
    println!("Refreshing enabled sources...");
    match ctx.refresher.refresh(ctx.store.clone()).await? {
        RefreshStatus::Completed(outcome) => {
            for issue in &outcome.issues {
                eprintln!("  Error updating {}: {}", issue.source_id, issue.message);
            }
            println!(
                "Refresh complete: {} new items, {} errors",
                outcome.new_items,
                outcome.issues.len()
            );
        }
        RefreshStatus::Skipped => {
            println!("A refresh is already running");
        }
        RefreshStatus::Stale { .. } => {
            println!("Refresh results superseded by a newer run");
        }
    }
    Ok(())
}

pub async fn sync(ctx: &AppContext) -> Result<()> {
    let client = ctx
        .sync
        .as_ref()
        .ok_or_else(|| InletError::Config("No sync endpoint configured".into()))?;

    println!("Syncing from remote...");
    let summary = client.run(ctx.store.as_ref()).await?;
    println!(
        "Sync complete: {} accepted, {} skipped (cursor {} -> {})",
        summary.accepted,
        summary.skipped,
        summary.previous_cursor.as_deref().unwrap_or("none"),
        summary.cursor
    );
    Ok(())
}

pub fn mark_read(ctx: &AppContext, url: &str) -> Result<()> {
    let item = require_item(ctx, url)?;
    ctx.store.update_item_status(url, ItemStatus::Read)?;
    ctx.store.record_action(item.id, ActionKind::Read, None)?;
    println!("Marked read: {}", item.title);
    Ok(())
}

pub fn triage(ctx: &AppContext, url: &str, bucket: &str) -> Result<()> {
    let bucket = Bucket::parse(bucket)
        .ok_or_else(|| InletError::Config(format!("Unknown bucket: {}", bucket)))?;
    let item = require_item(ctx, url)?;
    let status = bucket.to_status();
    ctx.store.update_item_status(url, status)?;
    if status == ItemStatus::Read {
        ctx.store.record_action(item.id, ActionKind::Read, None)?;
    } else if status == ItemStatus::Saved {
        ctx.store.record_action(item.id, ActionKind::Save, None)?;
    }
    println!("Moved to {}: {}", bucket.as_str(), item.title);
    Ok(())
}

pub fn clip(ctx: &AppContext, url: &str) -> Result<()> {
    let item = require_item(ctx, url)?;
    ctx.store.update_item_status(url, ItemStatus::Clipped)?;
    ctx.store.record_action(item.id, ActionKind::Clip, None)?;
    println!("Clipped: {}", item.title);
    Ok(())
}

pub fn dismiss(ctx: &AppContext, url: &str) -> Result<()> {
    let item = require_item(ctx, url)?;
    ctx.store.update_item_status(url, ItemStatus::Dismissed)?;
    ctx.store.record_action(item.id, ActionKind::Dismiss, None)?;
    println!("Dismissed: {}", item.title);
    Ok(())
}

pub fn idea(ctx: &AppContext, url: &str, note: Option<String>) -> Result<()> {
    let item = require_item(ctx, url)?;
    let metadata = match note {
        Some(n) => Some(serde_json::json!({ "note": n }).to_string()),
        None => None,
    };
    ctx.store
        .record_action(item.id, ActionKind::ContentIdea, metadata.as_deref())?;
    println!("Saved idea: {}", item.title);
    Ok(())
}

pub async fn summarize(ctx: &AppContext, url: &str) -> Result<()> {
    let item = require_item(ctx, url)?;

    let text = if item.display_content().trim().is_empty() {
        // Nothing stored locally; pull the page and strip it to text.
        let body = ctx.fetcher.fetch(&item.url).await?;
        let html = String::from_utf8_lossy(&body);
        crate::summarizer::Summarizer::page_to_text(&html).unwrap_or_default()
    } else {
        item.display_content().to_string()
    };

    let digest = ctx.summarizer.summarize(&item.title, &text).await?;
    ctx.store.set_item_summary(url, &digest.to_string())?;
    println!("{}", digest);
    Ok(())
}

fn require_item(ctx: &AppContext, url: &str) -> Result<crate::domain::Item> {
    ctx.store
        .get_item_by_url(url)?
        .ok_or_else(|| InletError::ItemNotFound(url.to_string()))
}
