//! Article documents and their public projection.
//!
//! The stored shape is [`Article`]. Handlers never send it over the wire;
//! they send [`ArticleView`], which drops the identifier and replaces the
//! author name pair with the derived full name.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Schema validation failures, raised when a document is about to be persisted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is empty.
    #[error("field `{0}` is required")]
    Required(&'static str),

    /// A field could not be read as the expected type.
    #[error("malformed article: {0}")]
    Malformed(String),
}

/// The author name pair stored with each article.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl Author {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// First and last name joined by one space, outer whitespace trimmed.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// A persisted article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub author: Author,
}

impl Article {
    /// Assign a fresh identifier to a validated [`NewArticle`].
    pub fn from_new(new: NewArticle) -> Result<Self, ValidationError> {
        new.validate()?;
        Ok(Self {
            id: ObjectId::new(),
            title: new.title,
            content: new.content,
            author: new.author,
        })
    }

    /// Derived, never stored.
    pub fn author_name(&self) -> String {
        self.author.full_name()
    }

    /// The externally visible projection of this record.
    pub fn to_view(&self) -> ArticleView {
        ArticleView {
            title: self.title.clone(),
            content: self.content.clone(),
            author: self.author_name(),
        }
    }
}

/// Wire form of an article: `{title, content, author}` where `author` is the full name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleView {
    pub title: String,
    pub content: String,
    pub author: String,
}

/// Body of `GET /posts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleList {
    pub articles: Vec<ArticleView>,
}

impl FromIterator<ArticleView> for ArticleList {
    fn from_iter<I: IntoIterator<Item = ArticleView>>(iter: I) -> Self {
        Self {
            articles: iter.into_iter().collect(),
        }
    }
}

/// Fields supplied when creating an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewArticle {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub author: Author,
}

impl NewArticle {
    /// Read a request body whose required keys have already been checked.
    pub fn from_body(body: Map<String, Value>) -> Result<Self, ValidationError> {
        serde_json::from_value(Value::Object(body))
            .map_err(|e| ValidationError::Malformed(e.to_string()))
    }

    /// Title, content and both author name parts must be non-empty.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.is_empty() {
            return Err(ValidationError::Required("title"));
        }
        if self.content.is_empty() {
            return Err(ValidationError::Required("content"));
        }
        if self.author.first_name.is_empty() {
            return Err(ValidationError::Required("author.firstName"));
        }
        if self.author.last_name.is_empty() {
            return Err(ValidationError::Required("author.lastName"));
        }
        Ok(())
    }
}

/// A partial update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
}

impl ArticleUpdate {
    /// Pick `title`, `content` and `author` out of a request body; other keys are ignored.
    pub fn from_body(body: &Map<String, Value>) -> Result<Self, ValidationError> {
        let updatable: Map<String, Value> = ["title", "content", "author"]
            .into_iter()
            .filter_map(|key| body.get(key).map(|v| (key.to_string(), v.clone())))
            .collect();

        serde_json::from_value(Value::Object(updatable))
            .map_err(|e| ValidationError::Malformed(e.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.author.is_none()
    }

    /// Overwrite the supplied fields of `article`. The identifier is never touched.
    pub fn apply_to(&self, article: &mut Article) {
        if let Some(title) = &self.title {
            article.title = title.clone();
        }
        if let Some(content) = &self.content {
            article.content = content.clone();
        }
        if let Some(author) = &self.author {
            article.author = author.clone();
        }
    }
}
