//! dwq — dialect-aware SQL query composition and summary engine.
//!
//! Builds SQL text from an immutable set of clause fragments, wraps the
//! rendered text as a CTE for a second "summary query" phase, and renders
//! dialect-specific variants from one fragment set.

pub mod clause;
pub mod db;
pub mod dialect;
pub mod error;
pub mod qry;
pub mod subst;
pub mod summary;

pub use clause::Args;
pub use db::{Db, Row, Runner, Table};
pub use dialect::{Dialect, DialectAdapter};
pub use error::{DwqError, DwqResult};
pub use qry::{CaseBuilder, JoinKind, Qry};
pub use subst::bind_mods;
pub use summary::Summary;

pub mod prelude {
    pub use crate::clause::Args;
    pub use crate::db::{Db, Row, Runner, Table};
    pub use crate::dialect::Dialect;
    pub use crate::error::{DwqError, DwqResult};
    pub use crate::qry::{JoinKind, Qry};
    pub use crate::summary::Summary;
}
