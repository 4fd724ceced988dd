//! # Models
//!
//! Resource declarations: collection names, schemas and relations.

pub mod bootcamp;
pub mod course;

use crate::schema::Schema;

pub use bootcamp::Bootcamp;
pub use course::Course;

/// A stored resource type
pub trait Resource: Send + Sync + 'static {
    /// Collection holding the documents
    const COLLECTION: &'static str;

    /// Name used in messages ("Bootcamp")
    const LABEL: &'static str;

    /// Schema enforced on create and update
    fn schema() -> &'static Schema;
}

/// How related documents are joined into a result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// Documents in `collection` whose `foreign_field` holds this document's id,
    /// attached as an array under `path`
    Children {
        path: &'static str,
        collection: &'static str,
        foreign_field: &'static str,
        select: Option<&'static [&'static str]>,
    },

    /// The document whose id is stored in `path`, replacing the id in place
    Parent {
        path: &'static str,
        collection: &'static str,
        select: Option<&'static [&'static str]>,
    },
}

impl Relation {
    /// Field the related documents are attached under
    pub fn path(&self) -> &'static str {
        match self {
            Relation::Children { path, .. } | Relation::Parent { path, .. } => path,
        }
    }
}
