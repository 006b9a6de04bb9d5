use crate::error::{Error, Result};

/// Header fields the roster needs, in output order followed by the two flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    SubjectId,
    SubjectName,
    Phonetic,
    Sex,
    BirthDate,
    EmployeeNo,
    CompanyName,
    CompanyCode,
    DepartmentCode,
    DepartmentName,
    FundusSingleEye,
    FundusBothEyes,
}

impl Field {
    pub const ALL: [Field; 12] = [
        Field::SubjectId,
        Field::SubjectName,
        Field::Phonetic,
        Field::Sex,
        Field::BirthDate,
        Field::EmployeeNo,
        Field::CompanyName,
        Field::CompanyCode,
        Field::DepartmentCode,
        Field::DepartmentName,
        Field::FundusSingleEye,
        Field::FundusBothEyes,
    ];

    /// Exact header text of the column.
    pub fn label(self) -> &'static str {
        match self {
            Field::SubjectId => "受診者ID",
            Field::SubjectName => "受診者名",
            Field::Phonetic => "ﾌﾘｶﾞﾅ",
            Field::Sex => "性別",
            Field::BirthDate => "生年月日",
            Field::EmployeeNo => "社員No",
            Field::CompanyName => "企業名",
            Field::CompanyCode => "企業cd",
            Field::DepartmentCode => "所属cd１",
            Field::DepartmentName => "所属名１",
            Field::FundusSingleEye => "●眼底片眼",
            Field::FundusBothEyes => "●眼底両眼",
        }
    }

    fn from_label(label: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|field| field.label() == label)
    }
}

/// Zero-based positions of every [`Field`] within one header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    positions: [usize; 12],
}

impl ColumnMap {
    /// Locates every field in `header`.
    ///
    /// A label that appears more than once resolves to its rightmost column.
    /// Fails with every absent label if any field is not found.
    pub fn resolve(header: &[String]) -> Result<ColumnMap> {
        let mut found: [Option<usize>; 12] = [None; 12];
        for (pos, name) in header.iter().enumerate() {
            if let Some(field) = Field::from_label(name) {
                found[field as usize] = Some(pos);
            }
        }

        let missing: Vec<&'static str> = Field::ALL
            .into_iter()
            .filter(|&field| found[field as usize].is_none())
            .map(Field::label)
            .collect();
        if !missing.is_empty() {
            return Err(Error::MissingColumns { labels: missing });
        }

        let mut positions = [0; 12];
        for (slot, pos) in positions.iter_mut().zip(found.into_iter().flatten()) {
            *slot = pos;
        }
        Ok(ColumnMap { positions })
    }

    pub fn position(&self, field: Field) -> usize {
        self.positions[field as usize]
    }
}
