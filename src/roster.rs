use serde::Serialize;

use crate::columns::{ColumnMap, Field};
use crate::error::{Error, Result};
use crate::records::Row;

/// One line of the fundus-exam roster.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct RosterRow {
    pub subject_id: String,
    pub subject_name: String,
    pub phonetic: String,
    pub sex: String,
    pub birth_date: String,
    pub employee_no: String,
    pub company_name: String,
    pub company_code: String,
    pub department_code: String,
    pub department_name: String,
}

impl RosterRow {
    fn project(row: &[String], index: usize, columns: &ColumnMap) -> Result<RosterRow> {
        let value = |field: Field| cell(row, index, columns, field).map(str::to_owned);
        Ok(RosterRow {
            subject_id: value(Field::SubjectId)?,
            subject_name: value(Field::SubjectName)?,
            phonetic: value(Field::Phonetic)?,
            sex: value(Field::Sex)?,
            birth_date: value(Field::BirthDate)?,
            employee_no: value(Field::EmployeeNo)?,
            company_name: value(Field::CompanyName)?,
            company_code: value(Field::CompanyCode)?,
            department_code: value(Field::DepartmentCode)?,
            department_name: value(Field::DepartmentName)?,
        })
    }
}

fn cell<'a>(row: &'a [String], index: usize, columns: &ColumnMap, field: Field) -> Result<&'a str> {
    row.get(columns.position(field))
        .map(String::as_str)
        .ok_or(Error::ShortRow {
            row: index,
            width: row.len(),
        })
}

/// True when either fundus flag holds exactly `marker`.
pub fn needs_fundus_exam(single_eye: &str, both_eyes: &str, marker: &str) -> bool {
    single_eye == marker || both_eyes == marker
}

/// Projects the header and every flagged data row onto the roster columns.
///
/// `rows[0]` is the header and always passes.
pub fn build_roster(rows: &[Row], columns: &ColumnMap, marker: &str) -> Result<Vec<RosterRow>> {
    let mut roster = Vec::new();
    for (index, row) in rows.iter().enumerate() {
        if index > 0 {
            let single_eye = cell(row, index, columns, Field::FundusSingleEye)?;
            let both_eyes = cell(row, index, columns, Field::FundusBothEyes)?;
            if !needs_fundus_exam(single_eye, both_eyes, marker) {
                continue;
            }
        }
        roster.push(RosterRow::project(row, index, columns)?);
    }

    tracing::info!(
        rows = rows.len().saturating_sub(1),
        selected = roster.len().saturating_sub(1),
        "selected fundus examinees"
    );
    Ok(roster)
}
