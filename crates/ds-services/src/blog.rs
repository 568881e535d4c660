//! Blog listing, filtering and rendering on top of a `ContentSource`.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Datelike, Utc};
pub use ds_core::models::read_time;
use ds_core::{BlogPost, ContentSource};
use pulldown_cmark::{html, Options, Parser};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateCategory {
    pub year: i32,
    pub month: u32,
    pub count: usize,
}

/// Filters accepted by the blog index (`?q=&tag=&year=&month=`).
///
/// `year` and `month` arrive as raw strings: blank means "no filter", and a
/// value that is not a number matches no post.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlogQuery {
    pub q: Option<String>,
    pub tag: Option<String>,
    pub year: Option<String>,
    pub month: Option<String>,
}

fn non_blank(v: Option<&str>) -> Option<&str> {
    v.map(str::trim).filter(|s| !s.is_empty())
}

impl BlogQuery {
    pub fn apply(&self, posts: &[BlogPost]) -> Vec<BlogPost> {
        let tags: Vec<String> = self.tag.iter().filter(|t| !t.is_empty()).cloned().collect();
        let mut out = search(posts, self.q.as_deref().unwrap_or_default());
        out = filter_by_tags(&out, &tags);
        if let Some(year) = non_blank(self.year.as_deref()) {
            let month = non_blank(self.month.as_deref()).map(str::parse::<u32>).transpose();
            out = match (year.parse::<i32>(), month) {
                (Ok(year), Ok(month)) => filter_by_date(&out, year, month),
                _ => Vec::new(),
            };
        }
        out
    }
}

#[derive(Clone)]
pub struct BlogService {
    content: Arc<dyn ContentSource>,
}

impl BlogService {
    pub fn new(content: Arc<dyn ContentSource>) -> Self {
        Self { content }
    }

    /// Published posts, newest first. Content errors yield an empty list.
    pub async fn posts(&self) -> Vec<BlogPost> {
        match self.content.load_posts().await {
            Ok(posts) => published_newest_first(posts),
            Err(e) => {
                tracing::error!(error = %e, "failed to load blog posts");
                Vec::new()
            }
        }
    }

    /// A published post by slug. Drafts are not served.
    pub async fn post(&self, slug: &str) -> Option<BlogPost> {
        match self.content.load_post(slug).await {
            Ok(post) => post.filter(|p| p.published),
            Err(e) => {
                tracing::error!(slug, error = %e, "failed to load blog post");
                None
            }
        }
    }
}

pub fn published_newest_first(posts: Vec<BlogPost>) -> Vec<BlogPost> {
    let mut posts: Vec<_> = posts.into_iter().filter(|p| p.published).collect();
    posts.sort_by(|a, b| b.date.cmp(&a.date));
    posts
}

/// Tags with their post counts, most used first.
pub fn tag_counts(posts: &[BlogPost]) -> Vec<TagCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for tag in posts.iter().flat_map(|p| &p.tags) {
        *counts.entry(tag.as_str()).or_default() += 1;
    }
    let mut out: Vec<_> = counts
        .into_iter()
        .map(|(name, count)| TagCount { name: name.to_string(), count })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    out
}

/// Post counts per year/month, newest month first.
pub fn date_categories(posts: &[BlogPost]) -> Vec<DateCategory> {
    let mut counts: BTreeMap<(i32, u32), usize> = BTreeMap::new();
    for p in posts {
        *counts.entry((p.date.year(), p.date.month())).or_default() += 1;
    }
    counts
        .into_iter()
        .rev()
        .map(|((year, month), count)| DateCategory { year, month, count })
        .collect()
}

/// Case-insensitive match on title, excerpt, body and tags.
pub fn search(posts: &[BlogPost], query: &str) -> Vec<BlogPost> {
    let term = query.trim().to_lowercase();
    if term.is_empty() {
        return posts.to_vec();
    }
    posts
        .iter()
        .filter(|p| {
            p.title.to_lowercase().contains(&term)
                || p.excerpt.to_lowercase().contains(&term)
                || p.content.to_lowercase().contains(&term)
                || p.tags.iter().any(|t| t.to_lowercase().contains(&term))
        })
        .cloned()
        .collect()
}

/// Posts carrying at least one of `tags`; all posts when `tags` is empty.
pub fn filter_by_tags(posts: &[BlogPost], tags: &[String]) -> Vec<BlogPost> {
    if tags.is_empty() {
        return posts.to_vec();
    }
    posts
        .iter()
        .filter(|p| tags.iter().any(|t| p.tags.contains(t)))
        .cloned()
        .collect()
}

pub fn filter_by_date(posts: &[BlogPost], year: i32, month: Option<u32>) -> Vec<BlogPost> {
    posts
        .iter()
        .filter(|p| p.date.year() == year && month.map_or(true, |m| p.date.month() == m))
        .cloned()
        .collect()
}

/// Other posts ranked by the number of tags shared with `current`.
pub fn related_posts(current: &BlogPost, all: &[BlogPost], limit: usize) -> Vec<BlogPost> {
    let mut scored: Vec<(usize, &BlogPost)> = all
        .iter()
        .filter(|p| p.slug != current.slug)
        .map(|p| {
            let shared = p.tags.iter().filter(|t| current.tags.contains(t)).count();
            (shared, p)
        })
        .filter(|(shared, _)| *shared > 0)
        .collect();
    // stable sort keeps the incoming (newest first) order among ties
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().take(limit).map(|(_, p)| p.clone()).collect()
}

/// Markdown to HTML. Fenced code keeps its `language-*` class so the page
/// can highlight it client-side.
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Posts at most a week old show a relative time instead of a date.
pub fn shows_relative_time(date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    (now - date).num_days() <= 7
}

pub fn relative_time(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - date).num_seconds();
    let ago = |n: i64, unit: &str| {
        if n == 1 {
            format!("1 {unit} ago")
        } else {
            format!("{n} {unit}s ago")
        }
    };
    match secs {
        s if s < 60 => "just now".to_string(),
        s if s < 3_600 => ago(s / 60, "minute"),
        s if s < 86_400 => ago(s / 3_600, "hour"),
        s if s < 604_800 => ago(s / 86_400, "day"),
        s if s < 2_592_000 => ago(s / 604_800, "week"),
        s if s < 31_536_000 => ago(s / 2_592_000, "month"),
        s => ago(s / 31_536_000, "year"),
    }
}

/// What the templates print next to a post.
pub fn display_date(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    if shows_relative_time(date, now) {
        relative_time(date, now)
    } else {
        date.format("%B %-d, %Y").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use ds_core::MockContentSource;

    fn post(slug: &str, date: &str, tags: &[&str]) -> BlogPost {
        BlogPost {
            slug: slug.into(),
            title: format!("Title {slug}"),
            excerpt: "excerpt".into(),
            content: "body text".into(),
            date: format!("{date}T00:00:00Z").parse().unwrap(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            author: None,
            cover_image: None,
            published: true,
            read_time: 1,
        }
    }

    #[test]
    fn test_read_time() {
        assert_eq!(read_time(""), 1);
        assert_eq!(read_time(&"word ".repeat(250)), 1);
        assert_eq!(read_time(&"word ".repeat(251)), 2);
    }

    #[test]
    fn test_published_newest_first() {
        let mut draft = post("draft", "2024-05-01", &[]);
        draft.published = false;
        let posts = vec![post("a", "2024-01-01", &[]), draft, post("b", "2024-03-01", &[])];
        let slugs: Vec<_> = published_newest_first(posts).into_iter().map(|p| p.slug).collect();
        assert_eq!(slugs, ["b", "a"]);
    }

    #[test]
    fn test_tag_counts_order() {
        let posts = vec![
            post("a", "2024-01-01", &["rust", "web"]),
            post("b", "2024-01-02", &["rust"]),
            post("c", "2024-01-03", &["css"]),
        ];
        let tags = tag_counts(&posts);
        assert_eq!(tags[0], TagCount { name: "rust".into(), count: 2 });
        assert_eq!(tags[1].name, "css");
        assert_eq!(tags[2].name, "web");
    }

    #[test]
    fn test_date_categories() {
        let posts = vec![
            post("a", "2023-12-05", &[]),
            post("b", "2024-02-01", &[]),
            post("c", "2024-02-20", &[]),
        ];
        assert_eq!(
            date_categories(&posts),
            vec![
                DateCategory { year: 2024, month: 2, count: 2 },
                DateCategory { year: 2023, month: 12, count: 1 },
            ]
        );
    }

    #[test]
    fn test_query_combines_filters() {
        let posts = vec![
            post("grid", "2024-02-01", &["CSS"]),
            post("hooks", "2024-02-10", &["React"]),
            post("old-css", "2023-02-01", &["CSS"]),
        ];
        let q = BlogQuery {
            tag: Some("CSS".into()),
            year: Some("2024".into()),
            ..Default::default()
        };
        let slugs: Vec<_> = q.apply(&posts).into_iter().map(|p| p.slug).collect();
        assert_eq!(slugs, ["grid"]);

        let q = BlogQuery { q: Some("HOOKS".into()), ..Default::default() };
        assert_eq!(q.apply(&posts).len(), 1);
        assert_eq!(BlogQuery::default().apply(&posts).len(), 3);

        let q = BlogQuery {
            year: Some("2024".into()),
            month: Some("3".into()),
            ..Default::default()
        };
        assert!(q.apply(&posts).is_empty());
    }

    #[test]
    fn test_query_tolerates_loose_date_params() {
        let posts = vec![
            post("grid", "2024-02-01", &["CSS"]),
            post("old-css", "2023-02-01", &["CSS"]),
        ];
        let query = |year: &str, month: &str| BlogQuery {
            year: Some(year.into()),
            month: Some(month.into()),
            ..Default::default()
        };

        assert_eq!(query("", "").apply(&posts).len(), 2);
        assert_eq!(query(" 2024 ", "").apply(&posts).len(), 1);
        assert_eq!(query("2024", "02").apply(&posts).len(), 1);
        assert!(query("abc", "").apply(&posts).is_empty());
        assert!(query("2024", "feb").apply(&posts).is_empty());
    }

    #[test]
    fn test_related_posts() {
        let current = post("cur", "2024-01-01", &["a", "b"]);
        let all = vec![
            current.clone(),
            post("one", "2024-01-02", &["a"]),
            post("two", "2024-01-03", &["a", "b"]),
            post("none", "2024-01-04", &["z"]),
        ];
        let slugs: Vec<_> = related_posts(&current, &all, 3).into_iter().map(|p| p.slug).collect();
        assert_eq!(slugs, ["two", "one"]);
        assert_eq!(related_posts(&current, &all, 1).len(), 1);
    }

    #[test]
    fn test_render_markdown() {
        let html = render_markdown("# Hi\n\n```rust\nfn main() {}\n```\n\n| a |\n|---|\n| b |\n");
        assert!(html.contains("<h1>Hi</h1>"));
        assert!(html.contains(r#"class="language-rust""#));
        assert!(html.contains("<table>"));
    }

    #[test]
    fn test_relative_time() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        assert_eq!(relative_time(now - Duration::seconds(30), now), "just now");
        assert_eq!(relative_time(now + Duration::seconds(30), now), "just now");
        assert_eq!(relative_time(now - Duration::minutes(5), now), "5 minutes ago");
        assert_eq!(relative_time(now - Duration::hours(1), now), "1 hour ago");
        assert_eq!(relative_time(now - Duration::days(3), now), "3 days ago");
        assert_eq!(relative_time(now - Duration::days(14), now), "2 weeks ago");
        assert_eq!(relative_time(now - Duration::days(400), now), "1 year ago");

        assert_eq!(display_date(now - Duration::days(2), now), "2 days ago");
        assert_eq!(display_date(now - Duration::days(30), now), "May 2, 2024");
    }

    #[tokio::test]
    async fn test_service_hides_drafts_and_errors() {
        let mut content = MockContentSource::new();
        content.expect_load_post().returning(|slug| {
            let mut p = post(slug, "2024-01-01", &[]);
            p.published = slug != "draft";
            Ok(Some(p))
        });
        content
            .expect_load_posts()
            .returning(|| Err(anyhow::anyhow!("disk gone")));
        let svc = BlogService::new(Arc::new(content));

        assert!(svc.post("live").await.is_some());
        assert!(svc.post("draft").await.is_none());
        assert!(svc.posts().await.is_empty());
    }
}
