//! Query fragment set and clause renderer.
//!
//! A [`Qry`] is an immutable record of clause text fragments. Every
//! clause-setting method returns a new `Qry`; the receiver is never
//! mutated, so a partially built query can be shared and derived from
//! concurrently. There are two main usages:
//!
//! 1. Render or run the sql query itself.
//! 2. Run a summary query on top of it: the rendered query is placed into
//!    a CTE under the alias `x`, and the summary operates on the
//!    intermediate result without materializing it.
//!
//! ```text
//! with x as (
//!     select
//!         a.*
//!         ,case when amt < 1000 then amt*1.2 else amt end as amt
//!     from test a
//!     where score > 0.5
//! )
//! select
//!     time,cat
//!     ,count(1) n
//!     ,avg(score) avgscore, round(sum(amt)/1e3,2) total
//! from x
//! group by time,cat
//! order by n desc
//! ```

use crate::clause::Args;
use crate::db::{Runner, Table};
use crate::dialect::Dialect;
use crate::error::{DwqError, DwqResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Join keyword, default `left`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinKind {
    Left,
    Inner,
    Right,
    Full,
    Cross,
    /// Verbatim compound keyword, e.g. `left outer`.
    Custom(String),
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kw = match self {
            JoinKind::Left => "left",
            JoinKind::Inner => "inner",
            JoinKind::Right => "right",
            JoinKind::Full => "full",
            JoinKind::Cross => "cross",
            JoinKind::Custom(kw) => kw.as_str(),
        };
        f.write_str(kw)
    }
}

/// An immutable set of clause fragments for one query.
///
/// Obtained from a data-source handle's [`qry`](crate::db::Db::qry)
/// factory, which seeds the source table and the dialect. The dialect
/// never changes across derivations.
#[derive(Clone)]
pub struct Qry<'a> {
    runner: &'a dyn Runner,
    dialect: Dialect,
    from_: Option<String>,
    select: Option<String>,
    join: Option<String>,
    where_: Option<String>,
    group_by: Option<String>,
    having: Option<String>,
    order_by: Option<String>,
    sql: Option<String>,
}

impl<'a> Qry<'a> {
    /// Create an empty fragment set bound to a runner and a dialect.
    pub fn new(runner: &'a dyn Runner, dialect: Dialect) -> Self {
        Self {
            runner,
            dialect,
            from_: None,
            select: None,
            join: None,
            where_: None,
            group_by: None,
            having: None,
            order_by: None,
            sql: None,
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub(crate) fn runner(&self) -> &'a dyn Runner {
        self.runner
    }

    /// Set the from clause.
    pub fn from_tbl(&self, table: impl Into<String>) -> Self {
        let mut q = self.clone();
        q.from_ = Some(table.into());
        q
    }

    /// Set the select clause.
    ///
    /// ```text
    /// qry.select("id,score,amt")
    /// qry.select(["id", "score", "amt"])
    /// ```
    pub fn select(&self, args: impl Into<Args>) -> Self {
        let mut q = self.clone();
        q.select = args.into().to_clause(",");
        q
    }

    /// Start a case-when statement that will be appended to the select
    /// clause. Calling this multiple times appends multiple statements.
    pub fn case(&self, col: impl Into<String>) -> CaseBuilder<'a> {
        CaseBuilder {
            qry: self.clone(),
            col: col.into(),
            whens: Vec::new(),
            els: None,
        }
    }

    /// Add a left join clause. Calling this multiple times adds multiple
    /// clauses, newline-separated, in call order.
    pub fn join(&self, table: &str, on: impl Into<Args>) -> Self {
        self.join_how(table, on, JoinKind::Left)
    }

    /// Add a join clause with an explicit join keyword.
    pub fn join_how(&self, table: &str, on: impl Into<Args>, kind: JoinKind) -> Self {
        let mut q = self.clone();
        let cls = match on.into().to_clause("\n    and ") {
            Some(on) => format!("{kind} join {table}\n    on {on}"),
            None => format!("{kind} join {table}"),
        };
        q.join = Some(match q.join.take() {
            Some(existing) => format!("{existing}\n{cls}"),
            None => cls,
        });
        q
    }

    /// Set the where clause; multiple conditions combine with `and`.
    pub fn filter(&self, args: impl Into<Args>) -> Self {
        let mut q = self.clone();
        q.where_ = args.into().to_clause("\n    and ");
        q
    }

    /// Set the group by clause.
    pub fn group_by(&self, args: impl Into<Args>) -> Self {
        let mut q = self.clone();
        q.group_by = args.into().to_clause(",");
        q
    }

    /// Set the having clause; multiple conditions combine with `and`.
    pub fn having(&self, args: impl Into<Args>) -> Self {
        let mut q = self.clone();
        q.having = args.into().to_clause("\n    and ");
        q
    }

    /// Set the order by clause.
    pub fn order_by(&self, args: impl Into<Args>) -> Self {
        let mut q = self.clone();
        q.order_by = args.into().to_clause(",");
        q
    }

    /// Replace the entire query by the given sql. All other fragments are
    /// ignored while the override is present. This lets arbitrary advanced
    /// sql be incorporated into the framework.
    pub fn raw(&self, sql: impl Into<String>) -> Self {
        let mut q = self.clone();
        q.sql = Some(sql.into());
        q
    }

    /// Render the fragment set to sql text. Pure: the same fragment set
    /// always renders the same text.
    pub fn to_sql(&self) -> String {
        if let Some(sql) = &self.sql {
            return sql.clone();
        }
        let select = match &self.select {
            Some(s) => format!("select {s}"),
            None => "select *".to_string(),
        };
        let from_ = match &self.from_ {
            Some(s) => format!("from {s}"),
            None => "from test".to_string(),
        };
        // Cosmetic: `select *` sits on one line with the from clause.
        let sep = if select == "select *" { " " } else { "\n" };
        let mut sql = format!("{select}{sep}{from_}");
        if let Some(join) = &self.join {
            sql.push('\n');
            sql.push_str(join);
        }
        if let Some(where_) = &self.where_ {
            sql.push_str("\nwhere ");
            sql.push_str(where_);
        }
        if let Some(group_by) = &self.group_by {
            sql.push_str("\ngroup by ");
            sql.push_str(group_by);
        }
        if let Some(having) = &self.having {
            sql.push_str("\nhaving ");
            sql.push_str(having);
        }
        if let Some(order_by) = &self.order_by {
            sql.push_str("\norder by ");
            sql.push_str(order_by);
        }
        self.dialect.adapter().finalize(sql)
    }

    /// Print the rendered query to standard output.
    pub fn print(&self) {
        println!("{self}");
    }

    /// Wrap the rendered query as a CTE under the alias `x` and append a
    /// summary query, or return the rendered query unmodified.
    pub fn compose(&self, summary: Option<&str>) -> String {
        let sql = self.to_sql();
        match summary {
            Some(s) => format!("with x as (\n    {}\n)\n{}", sql.replace('\n', "\n    "), s),
            None => sql,
        }
    }

    /// Run the underlying query directly.
    pub async fn run(&self) -> DwqResult<Option<Table>> {
        self.runner.run(&self.compose(None)).await
    }

    /// Run a caller-supplied summary query on top of this query. The
    /// summary sql must refer to the wrapped result through the alias `x`.
    pub async fn run_with(&self, summary_sql: &str) -> DwqResult<Option<Table>> {
        self.runner.run(&self.compose(Some(summary_sql))).await
    }
}

impl fmt::Display for Qry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

impl fmt::Debug for Qry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Qry")
            .field("dialect", &self.dialect)
            .field("from_", &self.from_)
            .field("select", &self.select)
            .field("join", &self.join)
            .field("where_", &self.where_)
            .field("group_by", &self.group_by)
            .field("having", &self.having)
            .field("order_by", &self.order_by)
            .field("sql", &self.sql)
            .finish()
    }
}

/// Builder for a case-when statement appended to the select clause.
#[derive(Clone)]
pub struct CaseBuilder<'a> {
    qry: Qry<'a>,
    col: String,
    whens: Vec<String>,
    els: Option<String>,
}

impl<'a> CaseBuilder<'a> {
    /// Add a when-fragment in the form `"condition then treatment"`.
    pub fn when(mut self, fragment: impl Into<String>) -> Self {
        self.whens.push(fragment.into());
        self
    }

    /// Add a condition-to-treatment mapping. Mappings are appended after
    /// the positional fragments, in call order.
    pub fn when_then(mut self, condition: &str, treatment: &str) -> Self {
        self.whens.push(format!("{condition} then {treatment}"));
        self
    }

    /// Set the else treatment, default `NULL`.
    pub fn els(mut self, treatment: impl Into<String>) -> Self {
        self.els = Some(treatment.into());
        self
    }

    /// Finish the statement and return the derived query.
    ///
    /// A single fragment shorter than 35 characters renders on one line;
    /// anything else renders in block form.
    pub fn end(self) -> DwqResult<Qry<'a>> {
        if self.whens.is_empty() {
            return Err(DwqError::InvalidCase("too few cases".to_string()));
        }
        let els = self.els.as_deref().unwrap_or("NULL");
        let col = &self.col;
        let cls = if self.whens.len() == 1 && self.whens[0].chars().count() < 35 {
            format!("\n    ,case when {} else {els} end as {col}", self.whens[0])
        } else {
            let whens = self.whens.join("\n        when ");
            format!("\n    ,case\n        when {whens}\n        else {els}\n    end as {col}")
        };
        let mut qry = self.qry;
        qry.select = Some(match qry.select.take() {
            Some(select) => format!("{select}{cls}"),
            None => format!("*{cls}"),
        });
        Ok(qry)
    }
}
