use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::core::error::SearchError;
use crate::search::{PaperEntry, PaperSource};

/// Client for the arXiv export API. Returns Atom XML; queries are
/// relevance-ranked, which downstream code relies on as the only relevance
/// signal.
pub struct ArxivClient {
    client: Client,
    base_url: String,
}

impl ArxivClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }
}

#[async_trait]
impl PaperSource for ArxivClient {
    async fn query(&self, text: &str, limit: usize) -> Result<Vec<PaperEntry>, SearchError> {
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("search_query", format!("all:{text}")),
                ("start", "0".into()),
                ("max_results", limit.to_string()),
                ("sortBy", "relevance".into()),
                ("sortOrder", "descending".into()),
            ])
            .send()
            .await
            .map_err(|e| SearchError::Http(e.to_string()))?;

        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(SearchError::Api {
                status,
                message: text,
            });
        }

        let xml = resp
            .text()
            .await
            .map_err(|e| SearchError::Http(e.to_string()))?;

        let feed: Feed =
            quick_xml::de::from_str(&xml).map_err(|e| SearchError::Parse(e.to_string()))?;

        Ok(feed.entries.into_iter().map(Entry::into_paper).collect())
    }
}

#[derive(Debug, Deserialize)]
struct Feed {
    #[serde(rename = "entry", default)]
    entries: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    id: String,
    title: String,
    summary: String,
    published: String,
    #[serde(rename = "author", default)]
    authors: Vec<Author>,
    #[serde(rename = "link", default)]
    links: Vec<Link>,
}

#[derive(Debug, Deserialize)]
struct Author {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Link {
    #[serde(rename = "@href")]
    href: String,
    #[serde(rename = "@title", default)]
    title: Option<String>,
    #[serde(rename = "@type", default)]
    link_type: Option<String>,
}

impl Entry {
    fn into_paper(self) -> PaperEntry {
        let pdf_url = self
            .links
            .iter()
            .find(|l| {
                l.title.as_deref() == Some("pdf")
                    || l.link_type.as_deref() == Some("application/pdf")
            })
            .map(|l| l.href.clone());

        PaperEntry {
            entry_id: self.id,
            title: self.title,
            summary: self.summary,
            published: DateTime::parse_from_rfc3339(self.published.trim())
                .map(|d| d.with_timezone(&Utc))
                .unwrap_or_else(|_| DateTime::<Utc>::MIN_UTC),
            authors: self.authors.into_iter().map(|a| a.name).collect(),
            pdf_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>ArXiv Query Results</title>
  <entry>
    <id>http://arxiv.org/abs/2101.00001v1</id>
    <published>2021-01-04T19:00:00Z</published>
    <title>Sample Paper on
  Quantum Things</title>
    <summary>  First line.
Second line.  </summary>
    <author><name>Jane Doe</name></author>
    <author><name>Richard Roe</name></author>
    <link href="http://arxiv.org/abs/2101.00001v1" rel="alternate" type="text/html"/>
    <link title="pdf" href="http://arxiv.org/pdf/2101.00001v1" rel="related" type="application/pdf"/>
  </entry>
</feed>"#;

    #[test]
    fn test_parse_atom_feed() {
        let feed: Feed = quick_xml::de::from_str(SAMPLE_FEED).unwrap();
        assert_eq!(feed.entries.len(), 1);

        let paper = feed.entries.into_iter().next().unwrap().into_paper();
        assert_eq!(paper.entry_id, "http://arxiv.org/abs/2101.00001v1");
        assert_eq!(paper.authors, vec!["Jane Doe", "Richard Roe"]);
        assert_eq!(paper.pdf_url.as_deref(), Some("http://arxiv.org/pdf/2101.00001v1"));
        assert_eq!(paper.published.to_rfc3339(), "2021-01-04T19:00:00+00:00");
    }

    #[test]
    fn test_parse_empty_feed() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom"><title>none</title></feed>"#;
        let feed: Feed = quick_xml::de::from_str(xml).unwrap();
        assert!(feed.entries.is_empty());
    }
}
