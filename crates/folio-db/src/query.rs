//! Statement builders shared by the SQLite backend and the repositories

use folio_core::position::{PositionedFamily, ShiftSpan};
use sea_query::{Alias, Asterisk, Expr, ExprTrait, Func, Order, Query, SqliteQueryBuilder};

use crate::error::{DbError, DbResult};
use crate::patch::FieldPatch;

/// `INSERT INTO {table} (...) VALUES (...)`
pub fn insert_sql(table: &str, patch: &FieldPatch) -> DbResult<String> {
	let (columns, values): (Vec<Alias>, Vec<Expr>) = patch
		.iter()
		.map(|(column, value)| (Alias::new(column), Expr::val(value.to_value())))
		.unzip();
	let mut stmt = Query::insert();
	stmt.into_table(Alias::new(table)).columns(columns);
	stmt.values(values).map_err(|e| DbError::Query(e.to_string()))?;
	Ok(stmt.to_string(SqliteQueryBuilder))
}

/// `UPDATE {table} SET ... WHERE id = {id}`
pub fn update_sql(table: &str, id: i64, patch: &FieldPatch) -> String {
	let mut stmt = Query::update();
	stmt.table(Alias::new(table));
	for (column, value) in patch.iter() {
		stmt.value(Alias::new(column), Expr::val(value.to_value()));
	}
	stmt.and_where(Expr::col(Alias::new("id")).eq(id));
	stmt.to_string(SqliteQueryBuilder)
}

/// `DELETE FROM {table} WHERE id = {id}`
pub fn delete_sql(table: &str, id: i64) -> String {
	Query::delete()
		.from_table(Alias::new(table))
		.and_where(Expr::col(Alias::new("id")).eq(id))
		.to_string(SqliteQueryBuilder)
}

/// `SELECT * FROM {table} WHERE id = {id}`
pub fn select_by_id_sql(table: &str, id: i64) -> String {
	Query::select()
		.column(Asterisk)
		.from(Alias::new(table))
		.and_where(Expr::col(Alias::new("id")).eq(id))
		.to_string(SqliteQueryBuilder)
}

/// `SELECT id FROM {table} WHERE id = {id}`
pub fn exists_sql(table: &str, id: i64) -> String {
	Query::select()
		.column(Alias::new("id"))
		.from(Alias::new(table))
		.and_where(Expr::col(Alias::new("id")).eq(id))
		.to_string(SqliteQueryBuilder)
}

/// Scope id and position of one ordered item
pub fn placement_sql(family: PositionedFamily, id: i64) -> String {
	Query::select()
		.columns([Alias::new(family.scope_column()), Alias::new("position")])
		.from(Alias::new(family.table()))
		.and_where(Expr::col(Alias::new("id")).eq(id))
		.to_string(SqliteQueryBuilder)
}

/// `SELECT COUNT(id) AS count` over one scope
pub fn count_in_scope_sql(family: PositionedFamily, scope_id: i64) -> String {
	Query::select()
		.expr_as(Func::count(Expr::col(Alias::new("id"))), Alias::new("count"))
		.from(Alias::new(family.table()))
		.and_where(Expr::col(Alias::new(family.scope_column())).eq(scope_id))
		.to_string(SqliteQueryBuilder)
}

/// Bulk sibling shift:
///
/// ```sql
/// UPDATE {table} SET position = position + {delta}
/// WHERE {scope} = ? AND position >= ? [AND position <= ?] [AND id <> ?]
/// ```
pub fn shift_sql(
	family: PositionedFamily,
	scope_id: i64,
	span: ShiftSpan,
	exclude: Option<i64>,
) -> String {
	let mut stmt = Query::update();
	stmt.table(Alias::new(family.table()))
		.value(
			Alias::new("position"),
			Expr::col(Alias::new("position")).add(span.direction.delta()),
		)
		.and_where(Expr::col(Alias::new(family.scope_column())).eq(scope_id))
		.and_where(Expr::col(Alias::new("position")).gte(span.from));
	if let Some(to) = span.to {
		stmt.and_where(Expr::col(Alias::new("position")).lte(to));
	}
	if let Some(id) = exclude {
		stmt.and_where(Expr::col(Alias::new("id")).ne(id));
	}
	stmt.to_string(SqliteQueryBuilder)
}

/// Items of one scope in sibling order; ties broken by id
pub fn list_in_scope_sql(family: PositionedFamily, scope_id: i64) -> String {
	Query::select()
		.column(Asterisk)
		.from(Alias::new(family.table()))
		.and_where(Expr::col(Alias::new(family.scope_column())).eq(scope_id))
		.order_by(Alias::new("position"), Order::Asc)
		.order_by(Alias::new("id"), Order::Asc)
		.to_string(SqliteQueryBuilder)
}
