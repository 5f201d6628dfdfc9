pub mod dedup;
pub mod feed;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};
use url::Url;

use crate::domain::{Category, NewItem, Source, SourceKind};

pub use feed::{FeedMeta, Normalizer};

/// Slugs are capped so pathological names don't produce unwieldy keys.
pub const SLUG_MAX_LEN: usize = 80;
/// Placeholder when slugification consumes the whole input.
pub const SLUG_FALLBACK: &str = "source";

// Accepted key spellings per logical field, tried in order. Resolved once
// here so alias handling never leaks downstream.
const TITLE_KEYS: &[&str] = &["title"];
const URL_KEYS: &[&str] = &["url", "link"];
const SOURCE_ID_KEYS: &[&str] = &["source_id", "sourceId"];
const SOURCE_NAME_KEYS: &[&str] = &["source_name", "sourceName", "source"];
const SOURCE_URL_KEYS: &[&str] = &["source_url", "sourceUrl"];
const AUTHOR_KEYS: &[&str] = &["author", "creator"];
const PUBLISHED_KEYS: &[&str] = &["published_at", "publishedAt", "pubDate", "published"];
const UPDATED_KEYS: &[&str] = &["updated_at", "updatedAt"];
const FETCHED_KEYS: &[&str] = &["fetched_at", "fetchedAt"];
const CONTENT_MD_KEYS: &[&str] = &["content_md", "contentMd", "content"];
const CONTENT_TEXT_KEYS: &[&str] = &["content_text", "contentText", "text"];
const SUMMARY_KEYS: &[&str] = &["summary", "description"];
const CATEGORY_KEYS: &[&str] = &["category"];
const KIND_KEYS: &[&str] = &["type", "kind"];
const SCORE_KEYS: &[&str] = &["score"];

/// Transient output of normalizing one raw sync record. Discarded after
/// the merge into the store.
#[derive(Debug, Clone)]
pub struct SyncCandidate {
    pub item: NewItem,
    pub source: Source,
    /// Watermark for sync cursor advancement: updated time, falling back
    /// to fetch time, falling back to published time.
    pub cursor: Option<DateTime<Utc>>,
}

/// Normalize one raw record of unknown shape into a candidate, or reject.
///
/// A record must carry a non-empty title and an absolute item URL, and must
/// resolve to some source id; everything else is optional.
pub fn normalize_record(raw: &Value, now: DateTime<Utc>) -> Option<SyncCandidate> {
    let obj = raw.as_object()?;

    let title = pick_str(obj, TITLE_KEYS)?;
    let url_str = pick_str(obj, URL_KEYS)?;
    let item_url = Url::parse(&url_str).ok()?;

    let explicit_id = pick_str(obj, SOURCE_ID_KEYS);
    let source_name = pick_str(obj, SOURCE_NAME_KEYS);
    let source_url = pick_str(obj, SOURCE_URL_KEYS);

    let source_id = explicit_id
        .or_else(|| source_name.as_deref().map(slugify))
        .or_else(|| source_url.as_deref().and_then(host_of).as_deref().map(slugify))
        .or_else(|| item_url.host_str().map(slugify))?;

    let published_at = pick_str(obj, PUBLISHED_KEYS).and_then(|s| parse_date(&s));
    let score = pick(obj, SCORE_KEYS).map(parse_score).unwrap_or(0.0);

    let mut item = NewItem::new(&source_id, &title, item_url.as_str());
    item.author = pick_str(obj, AUTHOR_KEYS);
    item.published_at = published_at;
    item.fetched_at = now;
    item.content_md = pick_str(obj, CONTENT_MD_KEYS);
    item.content_text = pick_str(obj, CONTENT_TEXT_KEYS);
    item.summary = pick_str(obj, SUMMARY_KEYS);
    item.score = score;

    let category = pick_str(obj, CATEGORY_KEYS)
        .map(|s| Category::parse(&s))
        .unwrap_or(Category::General);
    let kind = pick_str(obj, KIND_KEYS)
        .map(|s| SourceKind::parse(&s))
        .unwrap_or(SourceKind::Rss);

    let inferred_name = source_name
        .clone()
        .or_else(|| source_url.as_deref().and_then(host_of))
        .or_else(|| item_url.host_str().map(String::from))
        .unwrap_or_else(|| source_id.clone());
    let inferred_url = source_url.unwrap_or_else(|| origin_of(&item_url));

    let mut source = Source::new(source_id, inferred_name, inferred_url);
    source.kind = kind;
    source.category = category;
    source.added_at = now;

    let cursor = pick_str(obj, UPDATED_KEYS)
        .and_then(|s| parse_date(&s))
        .or_else(|| pick_str(obj, FETCHED_KEYS).and_then(|s| parse_date(&s)))
        .or(published_at);

    Some(SyncCandidate {
        item,
        source,
        cursor,
    })
}

fn pick<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| obj.get(*k))
}

fn pick_str(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    for key in keys {
        match obj.get(*key) {
            Some(Value::String(s)) if !s.trim().is_empty() => return Some(s.trim().to_string()),
            Some(Value::Number(n)) => return Some(n.to_string()),
            _ => continue,
        }
    }
    None
}

fn parse_score(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|f| f.is_finite()).unwrap_or(0.0)
}

/// General-purpose date parsing: invalid inputs become `None`, never "now",
/// so bad data can't corrupt ordering.
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|n| n.and_utc());
    }
    None
}

/// Lowercase, collapse non-alphanumeric runs to single hyphens, trim,
/// cap length. Empty results fall back to a constant placeholder.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len().min(SLUG_MAX_LEN));
    let mut pending_hyphen = false;

    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
        if slug.len() >= SLUG_MAX_LEN {
            break;
        }
    }

    slug.truncate(SLUG_MAX_LEN);
    if slug.is_empty() {
        SLUG_FALLBACK.to_string()
    } else {
        slug
    }
}

fn host_of(url_str: &str) -> Option<String> {
    Url::parse(url_str)
        .ok()
        .and_then(|u| u.host_str().map(String::from))
}

fn origin_of(url: &Url) -> String {
    url.origin().ascii_serialization()
}
