//! Summary query templates.
//!
//! Each template is a fixed sql skeleton that runs against the alias `x`,
//! the CTE wrapping a fragment set's rendered query. Templates are either
//! executed, printed, or returned as text.

use crate::clause::Args;
use crate::db::{Row, Table};
use crate::error::{DwqError, DwqResult};
use crate::dialect::Dialect;
use crate::qry::Qry;

/// A parameterized second-phase query over the wrapped alias `x`.
#[derive(Debug, Clone, PartialEq)]
pub enum Summary {
    /// Top 5 rows, dialect-specific row limiting.
    Head,
    /// Top row, dialect-specific row limiting.
    Top,
    /// Schema-only probe: zero rows, column names only.
    Cols,
    /// Row count as a single scalar.
    Len,
    /// One `count(distinct ...)` per key, in key order; a `Many` key
    /// concatenates its columns before counting. A key naming no columns
    /// is rejected.
    Dist(Vec<Args>),
    /// Max and min of one column.
    Mimx(String),
    /// Value count: group by with an optional automatic `count(1) n`
    /// column, optional custom aggregation clauses, and an optional order
    /// by override.
    Valc {
        group_by: Args,
        agg: Option<Args>,
        order_by: Option<String>,
        n: bool,
    },
    /// Content hash over the named columns. Dialect-restricted.
    Hash(Vec<String>),
}

impl Summary {
    /// Render the template for a dialect.
    pub fn to_sql(&self, dialect: Dialect) -> DwqResult<String> {
        let adapter = dialect.adapter();
        match self {
            Summary::Head => Ok(adapter.limit_rows(5)),
            Summary::Top => Ok(adapter.limit_rows(1)),
            Summary::Cols => Ok("select * from x where 1=2".to_string()),
            Summary::Len => Ok("select count(1) from x".to_string()),
            Summary::Dist(keys) => dist_sql(keys),
            Summary::Mimx(col) => Ok(format!("select \n    max({col}),min({col})\nfrom x")),
            Summary::Valc {
                group_by,
                agg,
                order_by,
                n,
            } => valc_sql(group_by, agg.as_ref(), order_by.as_deref(), *n),
            Summary::Hash(cols) => {
                if cols.is_empty() {
                    return Err(DwqError::InvalidArgs(
                        "hash needs at least one column; Qry::hash defaults to all columns"
                            .to_string(),
                    ));
                }
                adapter.hash_sql(&cols.join(" || '_' || "))
            }
        }
    }
}

fn dist_sql(keys: &[Args]) -> DwqResult<String> {
    if keys.is_empty() {
        return Err(DwqError::InvalidArgs(
            "dist needs at least one key".to_string(),
        ));
    }
    let mut body = String::new();
    for key in keys {
        let expr = key.to_clause(" || '_' || ").ok_or_else(|| {
            DwqError::InvalidArgs("dist key must name at least one column".to_string())
        })?;
        if body.is_empty() {
            body.push_str(&format!("    count(distinct {expr})\n"));
        } else {
            body.push_str(&format!("    ,count(distinct {expr})\n"));
        }
    }
    Ok(format!("select \n{body}from x"))
}

fn valc_sql(
    group_by: &Args,
    agg: Option<&Args>,
    order_by: Option<&str>,
    n: bool,
) -> DwqResult<String> {
    let group_by_cls = group_by
        .to_clause(",")
        .ok_or_else(|| DwqError::InvalidArgs("valc needs a group-by expression".to_string()))?;
    let agg_cls = match agg {
        None => String::new(),
        Some(Args::One(s)) => format!("    ,{s}\n"),
        Some(Args::Many(v)) => v.iter().map(|s| format!("    ,{s}\n")).collect(),
    };
    let order_by_cls = match order_by {
        Some(o) => o.to_string(),
        None if n => "n desc".to_string(),
        None => group_by_cls.clone(),
    };
    let n_cls = if n { "    ,count(1) n\n" } else { "" };
    Ok(format!(
        "select \n    {group_by_cls}\n{n_cls}{agg_cls}from x\ngroup by {group_by_cls}\norder by {order_by_cls}"
    ))
}

/// Summary terminal operations.
///
/// Each template supports three output modes: execute-and-return
/// ([`run_summary`](Qry::run_summary) and the typed conveniences below),
/// print the composed text ([`print_summary`](Qry::print_summary)), or
/// return the composed text ([`summary_sql`](Qry::summary_sql)).
impl<'a> Qry<'a> {
    /// Composed two-phase text for a summary template.
    pub fn summary_sql(&self, summary: &Summary) -> DwqResult<String> {
        let template = summary.to_sql(self.dialect())?;
        Ok(self.compose(Some(&template)))
    }

    /// Print the composed two-phase text to standard output.
    pub fn print_summary(&self, summary: &Summary) -> DwqResult<()> {
        println!("{}", self.summary_sql(summary)?);
        Ok(())
    }

    /// Compose and execute a summary template.
    pub async fn run_summary(&self, summary: &Summary) -> DwqResult<Option<Table>> {
        let sql = self.summary_sql(summary)?;
        self.runner().run(&sql).await
    }

    /// Fetch the top 5 rows of the wrapped query.
    pub async fn head(&self) -> DwqResult<Table> {
        self.expect_table(&Summary::Head).await
    }

    /// Fetch the top row of the wrapped query. A query matching no rows
    /// yields an empty row that still carries the column names.
    pub async fn top(&self) -> DwqResult<Row> {
        Ok(self.expect_table(&Summary::Top).await?.first())
    }

    /// Fetch the column names of the wrapped query.
    pub async fn cols(&self) -> DwqResult<Vec<String>> {
        Ok(self.expect_table(&Summary::Cols).await?.columns)
    }

    /// Count the rows of the wrapped query.
    pub async fn len(&self) -> DwqResult<i64> {
        scalar_i64(&self.expect_table(&Summary::Len).await?)
    }

    /// Count distinct occurrences within columns, or combinations of
    /// columns, of the wrapped query. One result value per key, in key
    /// order.
    pub async fn dist(&self, keys: Vec<Args>) -> DwqResult<Table> {
        self.expect_table(&Summary::Dist(keys)).await
    }

    /// Max and min values of a column of the wrapped query.
    pub async fn mimx(&self, col: &str) -> DwqResult<Table> {
        self.expect_table(&Summary::Mimx(col.to_string())).await
    }

    /// Value count of a column or combination of columns, with optional
    /// custom aggregation and ordering.
    pub async fn valc(
        &self,
        group_by: impl Into<Args>,
        agg: Option<Args>,
        order_by: Option<&str>,
        n: bool,
    ) -> DwqResult<Table> {
        self.expect_table(&Summary::Valc {
            group_by: group_by.into(),
            agg,
            order_by: order_by.map(str::to_string),
            n,
        })
        .await
    }

    /// Indicative content hash over the named columns, or over all columns
    /// of the wrapped query when none are given (one introspection round
    /// trip). Sensitive to any change in the underlying data.
    pub async fn hash(&self, cols: &[&str]) -> DwqResult<i64> {
        let cols: Vec<String> = if cols.is_empty() {
            self.cols().await?
        } else {
            cols.iter().map(|s| s.to_string()).collect()
        };
        scalar_i64(&self.expect_table(&Summary::Hash(cols)).await?)
    }

    async fn expect_table(&self, summary: &Summary) -> DwqResult<Table> {
        self.run_summary(summary).await?.ok_or_else(|| {
            DwqError::Execution("summary query returned no result set".to_string())
        })
    }
}

fn scalar_i64(table: &Table) -> DwqResult<i64> {
    table
        .scalar()
        .and_then(serde_json::Value::as_i64)
        .ok_or_else(|| DwqError::Execution("expected a scalar result".to_string()))
}
