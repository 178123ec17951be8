//! Role-aware identifier rewriting over a parsed T-SQL statement tree.
//!
//! The walk is pre-order: a node's own identifier slots are rewritten before its children are
//! visited, and every identifier is handed to [`apply_role`] together with the syntactic role
//! it plays at that position. Only the role decides whether the name gets bracketed:
//!
//! - [`IdentRole::Relation`]: every part of a table reference (`catalog.db.table`).
//! - [`IdentRole::Column`]: the name part of a column reference.
//! - [`IdentRole::Definition`]: column names in INSERT and MERGE column lists, CREATE TABLE/VIEW
//!   definitions and ALTER TABLE ADD.
//! - [`IdentRole::Qualifier`]: the `a` in `a.id`, which is usually a table alias. Never bracketed.
//! - [`IdentRole::Alias`]: table, column and CTE aliases. Never bracketed.
//!
//! Function names and table hints are left alone.

use crate::bracket::{bracket_ident, is_variable};
use serde::Serialize;
use sqlparser::ast::*;

/// Functions whose first argument is a bare date part keyword rather than a column.
const DATEPART_FUNCTIONS: &[&str] = &[
    "DATEADD",
    "DATEDIFF",
    "DATEDIFF_BIG",
    "DATENAME",
    "DATEPART",
    "DATETRUNC",
    "DATE_BUCKET",
];

/// The syntactic role an identifier plays where the walk found it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentRole {
    Relation,
    Column,
    Definition,
    Qualifier,
    Alias,
}

impl IdentRole {
    /// Whether identifiers in this role are rewritten to bracketed form.
    pub fn is_bracketed(self) -> bool {
        matches!(self, Self::Relation | Self::Column | Self::Definition)
    }
}

/// Tally of identifiers visited during one rewrite.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RewriteCounts {
    pub relations: usize,
    pub columns: usize,
    pub definitions: usize,
    pub preserved: usize,
}

impl RewriteCounts {
    /// Number of identifiers that were put in bracketed form.
    pub fn total(self) -> usize {
        self.relations + self.columns + self.definitions
    }

    pub fn merge(&mut self, other: RewriteCounts) {
        self.relations += other.relations;
        self.columns += other.columns;
        self.definitions += other.definitions;
        self.preserved += other.preserved;
    }
}

/// Bracket every qualifying identifier in `statements`, in place.
pub fn rewrite_statements(statements: &mut [Statement]) -> RewriteCounts {
    let mut counts = RewriteCounts::default();
    for stmt in statements {
        rewrite_statement(stmt, &mut counts);
    }
    counts
}

/// Decide the fate of one identifier from its role.
pub fn apply_role(ident: &mut Ident, role: IdentRole, counts: &mut RewriteCounts) {
    if !role.is_bracketed() {
        counts.preserved += 1;
        return;
    }
    if is_variable(ident) {
        return;
    }

    bracket_ident(ident);
    match role {
        IdentRole::Relation => counts.relations += 1,
        IdentRole::Column => counts.columns += 1,
        IdentRole::Definition => counts.definitions += 1,
        IdentRole::Qualifier | IdentRole::Alias => {}
    }
}

pub fn rewrite_statement(stmt: &mut Statement, counts: &mut RewriteCounts) {
    match stmt {
        Statement::Query(query) => rewrite_query(query, counts),
        Statement::Insert(insert) => {
            if let TableObject::TableName(name) = &mut insert.table {
                rewrite_object_name(name, IdentRole::Relation, counts);
            }
            for column in &mut insert.columns {
                apply_role(column, IdentRole::Definition, counts);
            }
            if let Some(source) = insert.source.as_mut() {
                rewrite_query(source, counts);
            }
            rewrite_assignments(&mut insert.assignments, counts);
        }
        Statement::Update {
            table,
            assignments,
            from,
            selection,
            ..
        } => {
            rewrite_table_with_joins(table, counts);
            rewrite_assignments(assignments, counts);
            if let Some(from) = from {
                match from {
                    UpdateTableFromKind::BeforeSet(tables)
                    | UpdateTableFromKind::AfterSet(tables) => {
                        for table in tables {
                            rewrite_table_with_joins(table, counts);
                        }
                    }
                }
            }
            if let Some(selection) = selection {
                rewrite_expr(selection, counts);
            }
        }
        Statement::Delete(delete) => {
            for name in &mut delete.tables {
                rewrite_object_name(name, IdentRole::Relation, counts);
            }
            match &mut delete.from {
                FromTable::WithFromKeyword(tables) | FromTable::WithoutKeyword(tables) => {
                    for table in tables {
                        rewrite_table_with_joins(table, counts);
                    }
                }
            }
            if let Some(using) = delete.using.as_mut() {
                for table in using {
                    rewrite_table_with_joins(table, counts);
                }
            }
            if let Some(selection) = delete.selection.as_mut() {
                rewrite_expr(selection, counts);
            }
        }
        Statement::Merge {
            table,
            source,
            on,
            clauses,
            ..
        } => {
            rewrite_table_factor(table, counts);
            rewrite_table_factor(source, counts);
            rewrite_expr(on, counts);
            for clause in clauses {
                if let Some(predicate) = clause.predicate.as_mut() {
                    rewrite_expr(predicate, counts);
                }
                match &mut clause.action {
                    MergeAction::Insert(insert) => {
                        for column in &mut insert.columns {
                            apply_role(column, IdentRole::Definition, counts);
                        }
                        if let MergeInsertKind::Values(values) = &mut insert.kind {
                            rewrite_values(values, counts);
                        }
                    }
                    MergeAction::Update { assignments } => {
                        rewrite_assignments(assignments, counts)
                    }
                    MergeAction::Delete => {}
                }
            }
        }
        Statement::CreateView {
            name,
            columns,
            query,
            ..
        } => {
            rewrite_object_name(name, IdentRole::Relation, counts);
            for column in columns {
                apply_role(&mut column.name, IdentRole::Definition, counts);
            }
            rewrite_query(query, counts);
        }
        Statement::CreateTable(create) => {
            rewrite_object_name(&mut create.name, IdentRole::Relation, counts);
            for column in &mut create.columns {
                apply_role(&mut column.name, IdentRole::Definition, counts);
            }
            if let Some(query) = create.query.as_mut() {
                rewrite_query(query, counts);
            }
        }
        Statement::Drop { names, .. } => {
            for name in names {
                rewrite_object_name(name, IdentRole::Relation, counts);
            }
        }
        Statement::Truncate { table_names, .. } => {
            for target in table_names {
                rewrite_object_name(&mut target.name, IdentRole::Relation, counts);
            }
        }
        // The index name is not a table or column reference.
        Statement::CreateIndex(index) => {
            rewrite_object_name(&mut index.table_name, IdentRole::Relation, counts);
            for column in &mut index.columns {
                rewrite_expr(&mut column.column.expr, counts);
            }
            for column in &mut index.include {
                apply_role(column, IdentRole::Column, counts);
            }
            if let Some(predicate) = index.predicate.as_mut() {
                rewrite_expr(predicate, counts);
            }
        }
        Statement::AlterTable {
            name, operations, ..
        } => {
            rewrite_object_name(name, IdentRole::Relation, counts);
            for operation in operations {
                rewrite_alter_table_operation(operation, counts);
            }
        }
        _ => {}
    }
}

fn rewrite_alter_table_operation(
    operation: &mut AlterTableOperation,
    counts: &mut RewriteCounts,
) {
    match operation {
        AlterTableOperation::AddColumn { column_def, .. } => {
            apply_role(&mut column_def.name, IdentRole::Definition, counts);
        }
        AlterTableOperation::DropColumn { column_names, .. } => {
            for column in column_names {
                apply_role(column, IdentRole::Column, counts);
            }
        }
        AlterTableOperation::AlterColumn { column_name, .. } => {
            apply_role(column_name, IdentRole::Column, counts);
        }
        AlterTableOperation::RenameColumn {
            old_column_name,
            new_column_name,
        } => {
            apply_role(old_column_name, IdentRole::Column, counts);
            apply_role(new_column_name, IdentRole::Definition, counts);
        }
        _ => {}
    }
}

fn rewrite_object_name(name: &mut ObjectName, role: IdentRole, counts: &mut RewriteCounts) {
    for part in &mut name.0 {
        if let ObjectNamePart::Identifier(ident) = part {
            apply_role(ident, role, counts);
        }
    }
}

/// A column path: every leading part qualifies, the last part names the column.
fn rewrite_column_path(idents: &mut [Ident], counts: &mut RewriteCounts) {
    if let Some((column, qualifiers)) = idents.split_last_mut() {
        for qualifier in qualifiers {
            apply_role(qualifier, IdentRole::Qualifier, counts);
        }
        apply_role(column, IdentRole::Column, counts);
    }
}

fn rewrite_table_alias(alias: &mut TableAlias, counts: &mut RewriteCounts) {
    apply_role(&mut alias.name, IdentRole::Alias, counts);
    for column in &mut alias.columns {
        apply_role(&mut column.name, IdentRole::Alias, counts);
    }
}

fn rewrite_assignments(assignments: &mut [Assignment], counts: &mut RewriteCounts) {
    for assignment in assignments {
        match &mut assignment.target {
            AssignmentTarget::ColumnName(name) => rewrite_assignment_target(name, counts),
            AssignmentTarget::Tuple(names) => {
                for name in names {
                    rewrite_assignment_target(name, counts);
                }
            }
        }
        rewrite_expr(&mut assignment.value, counts);
    }
}

fn rewrite_assignment_target(name: &mut ObjectName, counts: &mut RewriteCounts) {
    if let Some((column, qualifiers)) = name.0.split_last_mut() {
        for qualifier in qualifiers {
            if let ObjectNamePart::Identifier(ident) = qualifier {
                apply_role(ident, IdentRole::Qualifier, counts);
            }
        }
        if let ObjectNamePart::Identifier(ident) = column {
            apply_role(ident, IdentRole::Column, counts);
        }
    }
}

fn rewrite_query(query: &mut Query, counts: &mut RewriteCounts) {
    if let Some(with) = query.with.as_mut() {
        for cte in &mut with.cte_tables {
            rewrite_table_alias(&mut cte.alias, counts);
            rewrite_query(&mut cte.query, counts);
        }
    }

    rewrite_set_expr(query.body.as_mut(), counts);

    if let Some(order_by) = query.order_by.as_mut() {
        if let OrderByKind::Expressions(exprs) = &mut order_by.kind {
            for order_expr in exprs {
                rewrite_expr(&mut order_expr.expr, counts);
            }
        }
    }
}

fn rewrite_set_expr(body: &mut SetExpr, counts: &mut RewriteCounts) {
    match body {
        SetExpr::Select(select) => rewrite_select(select, counts),
        SetExpr::Query(query) => rewrite_query(query, counts),
        SetExpr::SetOperation { left, right, .. } => {
            rewrite_set_expr(left, counts);
            rewrite_set_expr(right, counts);
        }
        SetExpr::Values(values) => rewrite_values(values, counts),
        SetExpr::Insert(stmt)
        | SetExpr::Update(stmt)
        | SetExpr::Delete(stmt)
        | SetExpr::Merge(stmt) => rewrite_statement(stmt, counts),
        _ => {}
    }
}

fn rewrite_values(values: &mut Values, counts: &mut RewriteCounts) {
    for row in &mut values.rows {
        for expr in row {
            rewrite_expr(expr, counts);
        }
    }
}

fn rewrite_select(select: &mut Select, counts: &mut RewriteCounts) {
    for item in &mut select.projection {
        match item {
            SelectItem::UnnamedExpr(expr) => rewrite_expr(expr, counts),
            SelectItem::ExprWithAlias { expr, alias } => {
                rewrite_expr(expr, counts);
                apply_role(alias, IdentRole::Alias, counts);
            }
            _ => {}
        }
    }

    if let Some(into) = select.into.as_mut() {
        rewrite_object_name(&mut into.name, IdentRole::Relation, counts);
    }

    for table_with_joins in &mut select.from {
        rewrite_table_with_joins(table_with_joins, counts);
    }

    if let Some(selection) = select.selection.as_mut() {
        rewrite_expr(selection, counts);
    }

    if let GroupByExpr::Expressions(exprs, _) = &mut select.group_by {
        for expr in exprs {
            rewrite_expr(expr, counts);
        }
    }

    if let Some(having) = select.having.as_mut() {
        rewrite_expr(having, counts);
    }
}

fn rewrite_table_with_joins(table: &mut TableWithJoins, counts: &mut RewriteCounts) {
    rewrite_table_factor(&mut table.relation, counts);
    for join in &mut table.joins {
        rewrite_table_factor(&mut join.relation, counts);
        rewrite_join_operator(&mut join.join_operator, counts);
    }
}

fn rewrite_table_factor(relation: &mut TableFactor, counts: &mut RewriteCounts) {
    match relation {
        // Table hints such as `WITH (NOLOCK)` are keywords, not columns. With `args` present the
        // name belongs to a table-valued function and is left alone like other function names.
        TableFactor::Table {
            name, alias, args, ..
        } => {
            match args {
                Some(args) => {
                    for arg in &mut args.args {
                        rewrite_function_arg(arg, counts);
                    }
                }
                None => rewrite_object_name(name, IdentRole::Relation, counts),
            }
            if let Some(alias) = alias {
                rewrite_table_alias(alias, counts);
            }
        }
        TableFactor::Derived {
            subquery, alias, ..
        } => {
            rewrite_query(subquery, counts);
            if let Some(alias) = alias {
                rewrite_table_alias(alias, counts);
            }
        }
        TableFactor::TableFunction { expr, alias, .. } => {
            rewrite_expr(expr, counts);
            if let Some(alias) = alias {
                rewrite_table_alias(alias, counts);
            }
        }
        TableFactor::Function { args, alias, .. } => {
            for arg in args {
                rewrite_function_arg(arg, counts);
            }
            if let Some(alias) = alias {
                rewrite_table_alias(alias, counts);
            }
        }
        TableFactor::NestedJoin {
            table_with_joins,
            alias,
            ..
        } => {
            rewrite_table_with_joins(table_with_joins, counts);
            if let Some(alias) = alias {
                rewrite_table_alias(alias, counts);
            }
        }
        TableFactor::Pivot { table, alias, .. } | TableFactor::Unpivot { table, alias, .. } => {
            rewrite_table_factor(table, counts);
            if let Some(alias) = alias {
                rewrite_table_alias(alias, counts);
            }
        }
        _ => {}
    }
}

fn rewrite_join_operator(op: &mut JoinOperator, counts: &mut RewriteCounts) {
    match op {
        JoinOperator::Join(constraint)
        | JoinOperator::Inner(constraint)
        | JoinOperator::Left(constraint)
        | JoinOperator::LeftOuter(constraint)
        | JoinOperator::Right(constraint)
        | JoinOperator::RightOuter(constraint)
        | JoinOperator::FullOuter(constraint)
        | JoinOperator::CrossJoin(constraint)
        | JoinOperator::Semi(constraint)
        | JoinOperator::LeftSemi(constraint)
        | JoinOperator::RightSemi(constraint)
        | JoinOperator::Anti(constraint)
        | JoinOperator::LeftAnti(constraint)
        | JoinOperator::RightAnti(constraint)
        | JoinOperator::StraightJoin(constraint) => rewrite_join_constraint(constraint, counts),
        JoinOperator::AsOf {
            match_condition,
            constraint,
        } => {
            rewrite_expr(match_condition, counts);
            rewrite_join_constraint(constraint, counts);
        }
        JoinOperator::CrossApply | JoinOperator::OuterApply => {}
    }
}

fn rewrite_join_constraint(constraint: &mut JoinConstraint, counts: &mut RewriteCounts) {
    if let JoinConstraint::On(expr) = constraint {
        rewrite_expr(expr, counts);
    }
}

fn rewrite_expr(expr: &mut Expr, counts: &mut RewriteCounts) {
    match expr {
        Expr::Identifier(ident) => apply_role(ident, IdentRole::Column, counts),
        Expr::CompoundIdentifier(idents) => rewrite_column_path(idents, counts),
        Expr::BinaryOp { left, right, .. }
        | Expr::AnyOp { left, right, .. }
        | Expr::AllOp { left, right, .. } => {
            rewrite_expr(left, counts);
            rewrite_expr(right, counts);
        }
        Expr::IsDistinctFrom(left, right) | Expr::IsNotDistinctFrom(left, right) => {
            rewrite_expr(left, counts);
            rewrite_expr(right, counts);
        }
        Expr::Position { expr: inner, r#in } => {
            rewrite_expr(inner, counts);
            rewrite_expr(r#in, counts);
        }
        Expr::AtTimeZone {
            timestamp,
            time_zone,
        } => {
            rewrite_expr(timestamp, counts);
            rewrite_expr(time_zone, counts);
        }
        Expr::Substring {
            expr: inner,
            substring_from,
            substring_for,
            ..
        } => {
            rewrite_expr(inner, counts);
            if let Some(from) = substring_from.as_mut() {
                rewrite_expr(from, counts);
            }
            if let Some(length) = substring_for.as_mut() {
                rewrite_expr(length, counts);
            }
        }
        Expr::Trim {
            expr: inner,
            trim_what,
            trim_characters,
            ..
        } => {
            rewrite_expr(inner, counts);
            if let Some(what) = trim_what.as_mut() {
                rewrite_expr(what, counts);
            }
            if let Some(characters) = trim_characters.as_mut() {
                for character in characters {
                    rewrite_expr(character, counts);
                }
            }
        }
        Expr::UnaryOp { expr: inner, .. }
        | Expr::Ceil { expr: inner, .. }
        | Expr::Floor { expr: inner, .. }
        | Expr::Extract { expr: inner, .. }
        | Expr::Nested(inner)
        | Expr::IsNull(inner)
        | Expr::IsNotNull(inner)
        | Expr::IsTrue(inner)
        | Expr::IsNotTrue(inner)
        | Expr::IsFalse(inner)
        | Expr::IsNotFalse(inner)
        | Expr::IsUnknown(inner)
        | Expr::IsNotUnknown(inner) => rewrite_expr(inner, counts),
        Expr::Case {
            operand,
            conditions,
            else_result,
            ..
        } => {
            if let Some(operand) = operand.as_mut() {
                rewrite_expr(operand, counts);
            }
            for case_when in conditions {
                rewrite_expr(&mut case_when.condition, counts);
                rewrite_expr(&mut case_when.result, counts);
            }
            if let Some(else_result) = else_result.as_mut() {
                rewrite_expr(else_result, counts);
            }
        }
        Expr::Function(func) => rewrite_function(func, counts),
        Expr::Cast { expr: inner, .. }
        | Expr::Convert { expr: inner, .. }
        | Expr::Collate { expr: inner, .. } => rewrite_expr(inner, counts),
        Expr::Like { expr, pattern, .. }
        | Expr::ILike { expr, pattern, .. }
        | Expr::SimilarTo { expr, pattern, .. }
        | Expr::RLike { expr, pattern, .. } => {
            rewrite_expr(expr, counts);
            rewrite_expr(pattern, counts);
        }
        Expr::InSubquery {
            expr: inner,
            subquery,
            ..
        } => {
            rewrite_expr(inner, counts);
            rewrite_query(subquery, counts);
        }
        Expr::Subquery(subquery) | Expr::Exists { subquery, .. } => {
            rewrite_query(subquery, counts)
        }
        Expr::Between {
            expr: target,
            low,
            high,
            ..
        } => {
            rewrite_expr(target, counts);
            rewrite_expr(low, counts);
            rewrite_expr(high, counts);
        }
        Expr::InList {
            expr: target, list, ..
        } => {
            rewrite_expr(target, counts);
            for item in list {
                rewrite_expr(item, counts);
            }
        }
        Expr::Tuple(items) => {
            for item in items {
                rewrite_expr(item, counts);
            }
        }
        _ => {}
    }
}

fn rewrite_function(func: &mut Function, counts: &mut RewriteCounts) {
    let skip_datepart = takes_datepart(func);

    if let FunctionArguments::List(arg_list) = &mut func.args {
        for (index, arg) in arg_list.args.iter_mut().enumerate() {
            if index == 0 && skip_datepart {
                continue;
            }
            rewrite_function_arg(arg, counts);
        }
        for clause in &mut arg_list.clauses {
            match clause {
                FunctionArgumentClause::OrderBy(order_by_exprs) => {
                    for order_by_expr in order_by_exprs {
                        rewrite_expr(&mut order_by_expr.expr, counts);
                    }
                }
                FunctionArgumentClause::Limit(expr) => rewrite_expr(expr, counts),
                _ => {}
            }
        }
    }

    if let FunctionArguments::Subquery(query) = &mut func.args {
        rewrite_query(query, counts);
    }

    if let Some(filter) = func.filter.as_mut() {
        rewrite_expr(filter, counts);
    }

    for order_expr in &mut func.within_group {
        rewrite_expr(&mut order_expr.expr, counts);
    }

    if let Some(WindowType::WindowSpec(spec)) = func.over.as_mut() {
        for expr in &mut spec.partition_by {
            rewrite_expr(expr, counts);
        }
        for order_expr in &mut spec.order_by {
            rewrite_expr(&mut order_expr.expr, counts);
        }
    }
}

fn rewrite_function_arg(arg: &mut FunctionArg, counts: &mut RewriteCounts) {
    match arg {
        FunctionArg::Named { arg, .. }
        | FunctionArg::ExprNamed { arg, .. }
        | FunctionArg::Unnamed(arg) => {
            if let FunctionArgExpr::Expr(expr) = arg {
                rewrite_expr(expr, counts);
            }
        }
    }
}

fn takes_datepart(func: &Function) -> bool {
    let Some(ObjectNamePart::Identifier(name)) = func.name.0.last() else {
        return false;
    };
    DATEPART_FUNCTIONS
        .iter()
        .any(|candidate| name.value.eq_ignore_ascii_case(candidate))
}
