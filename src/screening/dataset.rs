use serde::Deserialize;
use std::io::Read;
use std::path::Path;

/// One candidate row from the resume export. Identifiers are assigned by the
/// upstream ATS and are not reissued here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeRecord {
    pub id: i64,
    pub text: String,
}

/// Ordered, read-only set of resumes loaded for a screening session.
#[derive(Debug, Clone, Default)]
pub struct ResumeDataset {
    records: Vec<ResumeRecord>,
}

impl ResumeDataset {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for record in csv_reader.deserialize::<ResumeRow>() {
            let row = record?;
            records.push(ResumeRecord {
                id: row.id,
                text: row.resume,
            });
        }

        Ok(Self { records })
    }

    pub fn records(&self) -> &[ResumeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct ResumeRow {
    #[serde(rename = "ID")]
    id: i64,
    #[serde(rename = "Resume")]
    resume: String,
}

/// Error enumeration for dataset loading failures.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("unable to read resume file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed resume CSV: {0}")]
    Csv(#[from] csv::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_id_and_resume_columns() {
        let csv = "ID,Resume\n1,Primary Teacher based in London\n2,Data analyst in Lagos\n";
        let dataset = ResumeDataset::from_reader(Cursor::new(csv)).expect("dataset parses");

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records()[0].id, 1);
        assert_eq!(dataset.records()[1].text, "Data analyst in Lagos");
    }

    #[test]
    fn preserves_row_order() {
        let csv = "ID,Resume\n9,third hire\n4,first hire\n7,second hire\n";
        let dataset = ResumeDataset::from_reader(Cursor::new(csv)).expect("dataset parses");

        let ids: Vec<i64> = dataset.records().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![9, 4, 7]);
    }

    #[test]
    fn rejects_non_numeric_ids() {
        let csv = "ID,Resume\nfirst,Some resume text\n";
        let error = ResumeDataset::from_reader(Cursor::new(csv)).expect_err("id must be numeric");
        assert!(matches!(error, DatasetError::Csv(_)));
    }
}
