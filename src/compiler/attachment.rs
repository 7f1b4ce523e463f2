//! Attachment fields, read from the shared attachment table.

use log::debug;

use crate::model::Field;
use crate::naming;
use crate::sql::expr::{coalesce, col, json_array, json_group_array, json_object, lit_str, table_col};
use crate::sql::{ExprExt, Join, Query, TableRef};

use super::assembler::RelationFragment;
use super::CompileOptions;

/// Properties of each attachment, in output order.
const ATTACHMENT_COLUMNS: [&str; 5] = ["name", "mime_type", "id", "size", "token"];

/// Aggregate the field's own attachment rows per record, then join the
/// result onto the base one row per record.
///
/// Rows are selected by field id, so two attachment fields on one table
/// never see each other's files. Records with no attachments get `[]`.
pub(crate) fn resolve_attachment(field: &Field, options: &CompileOptions) -> RelationFragment {
    let settings = &options.attachment;
    let alias = naming::attachment_alias(&field.id, &settings.table);
    debug!("attachment {} joins {} as {}", field.id, settings.table, alias);

    let object = json_object(
        ATTACHMENT_COLUMNS
            .iter()
            .map(|&column| (column, col(column)))
            .collect(),
    );
    let per_record = Query::new()
        .select(vec![
            col(&settings.record_id_column).into(),
            json_group_array(object).alias(field.id.as_str()),
        ])
        .from(TableRef::new(&settings.table))
        .filter(col(&settings.field_id_column).eq(lit_str(field.id.as_str())))
        .group_by(vec![col(&settings.record_id_column)]);

    let select = coalesce(vec![table_col(&alias, field.id.as_str()), json_array(vec![])])
        .alias(field.id.as_str());

    let on = table_col(&alias, &settings.record_id_column)
        .eq(table_col(&options.base_alias, &options.id_column));

    RelationFragment {
        field_id: field.id.clone(),
        join: Join::left(TableRef::subquery(per_record, &alias), on),
        alias,
        selects: vec![select],
    }
}
