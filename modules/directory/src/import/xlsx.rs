//! XLSX ingestion shared by the roster and cabinet imports: first sheet,
//! exact header row, generic cell-to-string coercion.

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};

use crate::domain::error::DomainError;

/// A data row, header excluded, cells coerced to trimmed strings.
pub type SheetRow = Vec<String>;

/// Read the first worksheet and validate that the header row is exactly
/// `expected_headers` (case-insensitive). File-level faults abort the import.
pub fn read_rows(bytes: &[u8], expected_headers: &[&str]) -> Result<Vec<SheetRow>, DomainError> {
    if bytes.is_empty() {
        return Err(DomainError::EmptyFile);
    }

    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).map_err(|_| {
        DomainError::invalid_file(
            "Le fichier fourni n'est pas un fichier Excel valide (format XLSX requis)",
        )
    })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| {
            DomainError::invalid_file("Le fichier Excel est vide ou la feuille n'existe pas")
        })?
        .map_err(|e| DomainError::invalid_file(format!("Feuille illisible: {e}")))?;

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| DomainError::invalid_file("La première ligne (en-tête) est manquante"))?;

    if !headers_match(header, expected_headers) {
        return Err(DomainError::invalid_file(format!(
            "Les colonnes de l'en-tête doivent être exactement '{}'",
            expected_headers.join("', '")
        )));
    }

    Ok(rows
        .map(|row| {
            expected_headers
                .iter()
                .enumerate()
                .map(|(i, _)| cell_to_string(row.get(i)))
                .collect()
        })
        .collect())
}

fn headers_match(header: &[Data], expected: &[&str]) -> bool {
    if header.len() < expected.len() {
        return false;
    }
    expected
        .iter()
        .enumerate()
        .all(|(i, want)| cell_to_string(header.get(i)).eq_ignore_ascii_case(want))
}

/// String cells pass through; numeric cells render without a fractional part
/// when whole (license numbers arrive as floats from most spreadsheets).
pub fn cell_to_string(cell: Option<&Data>) -> String {
    match cell {
        Some(Data::String(s)) => s.trim().to_string(),
        Some(Data::Float(f)) => {
            if f.fract() == 0.0 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Some(Data::Int(i)) => i.to_string(),
        Some(Data::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}
