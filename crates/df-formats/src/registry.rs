//! Read-only lookups over the static format table.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::category::DocumentCategory;
use crate::data::FORMATS;

/// Metadata for one file format as handled by one office-suite module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FormatInfo {
    /// File extension without the dot (e.g. `"docx"`).
    pub extension: &'static str,
    /// Filter name passed to the office suite for this format.
    pub filter_name: &'static str,
    pub mime_type: Option<&'static str>,
    pub category: DocumentCategory,
    /// Whether the format can be read as input.
    pub can_import: bool,
    /// Whether the format can be written as output.
    pub can_export: bool,
}

/// Static registry of supported formats.
///
/// All methods are associated functions over an immutable table; there is no
/// state to construct.
pub struct FormatRegistry;

impl FormatRegistry {
    /// Every registered format, in table order.
    pub fn all_formats() -> &'static [FormatInfo] {
        FORMATS
    }

    /// Extensions that can be read as input.
    pub fn supported_input_formats() -> BTreeSet<&'static str> {
        FORMATS
            .iter()
            .filter(|f| f.can_import)
            .map(|f| f.extension)
            .collect()
    }

    /// Extensions that can be written as output.
    pub fn supported_output_formats() -> BTreeSet<&'static str> {
        FORMATS
            .iter()
            .filter(|f| f.can_export)
            .map(|f| f.extension)
            .collect()
    }

    /// Whether some module imports `from_ext` and some module exports `to_ext`.
    pub fn can_convert(from_ext: &str, to_ext: &str) -> bool {
        let from_ext = normalize(from_ext);
        let to_ext = normalize(to_ext);
        let input_ok = FORMATS
            .iter()
            .any(|f| f.extension == from_ext && f.can_import);
        let output_ok = FORMATS
            .iter()
            .any(|f| f.extension == to_ext && f.can_export);
        input_ok && output_ok
    }

    /// Formats belonging to `category`.
    pub fn formats_by_category(category: DocumentCategory) -> Vec<FormatInfo> {
        FORMATS
            .iter()
            .filter(|f| f.category == category)
            .copied()
            .collect()
    }

    /// Like [`formats_by_category`](Self::formats_by_category) but takes the
    /// category by name (case-insensitive). Unknown names yield an empty list.
    pub fn formats_by_category_name(name: &str) -> Vec<FormatInfo> {
        match name.parse::<DocumentCategory>() {
            Ok(category) => Self::formats_by_category(category),
            Err(_) => Vec::new(),
        }
    }

    /// All entries for an extension. One extension can map to several
    /// modules (`html` is both a Writer and a Calc format).
    pub fn get_format(extension: &str) -> Vec<FormatInfo> {
        let extension = normalize(extension);
        FORMATS
            .iter()
            .filter(|f| f.extension == extension)
            .copied()
            .collect()
    }

    /// Filter name to use when converting `from_ext` into `to_ext`.
    ///
    /// Prefers an exporter in the same module as one that imports `from_ext`
    /// (so `docx → pdf` picks `writer_pdf_Export`, `xlsx → pdf` picks
    /// `calc_pdf_Export`), then any exporter of `to_ext`.
    pub fn export_filter(from_ext: &str, to_ext: &str) -> Option<&'static str> {
        let from_ext = normalize(from_ext);
        let to_ext = normalize(to_ext);

        let input_categories: Vec<DocumentCategory> = FORMATS
            .iter()
            .filter(|f| f.extension == from_ext && f.can_import)
            .map(|f| f.category)
            .collect();

        let exporters: Vec<&FormatInfo> = FORMATS
            .iter()
            .filter(|f| f.extension == to_ext && f.can_export)
            .collect();

        exporters
            .iter()
            .find(|f| input_categories.contains(&f.category))
            .or_else(|| exporters.first())
            .map(|f| f.filter_name)
    }
}

/// Strip a leading dot and lower-case.
fn normalize(ext: &str) -> String {
    ext.strip_prefix('.').unwrap_or(ext).to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_formats_non_empty() {
        assert!(!FormatRegistry::all_formats().is_empty());
    }

    #[test]
    fn input_formats_contain_expected() {
        let inputs = FormatRegistry::supported_input_formats();
        for ext in ["docx", "doc", "odt", "xlsx", "xls", "ods", "pptx", "ppt", "odp", "csv", "txt", "rtf"] {
            assert!(inputs.contains(ext), "{ext} not in supported input formats");
        }
        assert!(inputs.len() >= 40);
        assert!(!inputs.contains("pdf"));
    }

    #[test]
    fn output_formats_contain_expected() {
        let outputs = FormatRegistry::supported_output_formats();
        for ext in ["pdf", "docx", "odt", "xlsx", "csv", "pptx", "png", "jpg", "svg", "html", "epub"] {
            assert!(outputs.contains(ext), "{ext} not in supported output formats");
        }
        assert!(outputs.len() >= 20);
    }

    #[test]
    fn can_convert_known_pair() {
        assert!(FormatRegistry::can_convert("docx", "pdf"));
        assert!(FormatRegistry::can_convert("xlsx", "csv"));
    }

    #[test]
    fn can_convert_unknown_extensions() {
        assert!(!FormatRegistry::can_convert("xyz_invalid", "pdf"));
        assert!(!FormatRegistry::can_convert("docx", "xyz_invalid"));
        // pdf is export-only.
        assert!(!FormatRegistry::can_convert("pdf", "docx"));
    }

    #[test]
    fn can_convert_strips_dot_and_case() {
        assert_eq!(
            FormatRegistry::can_convert(".DOCX", ".PDF"),
            FormatRegistry::can_convert("docx", "pdf")
        );
        assert!(FormatRegistry::can_convert(".docx", ".pdf"));
    }

    #[test]
    fn can_convert_is_deterministic() {
        let first = FormatRegistry::can_convert("odt", "docx");
        for _ in 0..10 {
            assert_eq!(FormatRegistry::can_convert("odt", "docx"), first);
        }
    }

    #[test]
    fn get_format_single() {
        let results = FormatRegistry::get_format("docx");
        assert!(!results.is_empty());
        assert!(results.iter().all(|f| f.extension == "docx"));
    }

    #[test]
    fn get_format_multi_category() {
        let results = FormatRegistry::get_format(".HTML");
        let categories: BTreeSet<String> =
            results.iter().map(|f| f.category.to_string()).collect();
        assert!(categories.contains("writer"));
        assert!(categories.contains("calc"));
    }

    #[test]
    fn get_format_unknown() {
        assert!(FormatRegistry::get_format("zzzzz_unknown").is_empty());
    }

    #[test]
    fn export_filter_prefers_source_category() {
        assert_eq!(
            FormatRegistry::export_filter("docx", "pdf"),
            Some("writer_pdf_Export")
        );
        assert_eq!(
            FormatRegistry::export_filter("xlsx", "pdf"),
            Some("calc_pdf_Export")
        );
        assert_eq!(
            FormatRegistry::export_filter("pptx", "pdf"),
            Some("impress_pdf_Export")
        );
    }

    #[test]
    fn export_filter_falls_back_to_any_exporter() {
        // docx has no graphic importer, so the graphic png filter is used.
        assert_eq!(FormatRegistry::export_filter("docx", "png"), Some("png"));
        assert_eq!(FormatRegistry::export_filter("zzz", "yyy"), None);
    }

    #[test]
    fn each_category_returns_only_its_formats() {
        for category in DocumentCategory::ALL {
            let formats = FormatRegistry::formats_by_category(category);
            assert!(!formats.is_empty(), "no formats for {category}");
            assert!(formats.iter().all(|f| f.category == category));
        }
    }

    #[test]
    fn category_name_lookup() {
        let lower = FormatRegistry::formats_by_category_name("writer");
        let upper = FormatRegistry::formats_by_category_name("WRITER");
        let mixed = FormatRegistry::formats_by_category_name("Writer");
        assert_eq!(lower, upper);
        assert_eq!(upper, mixed);
        assert_eq!(lower, FormatRegistry::formats_by_category(DocumentCategory::Writer));
        assert!(FormatRegistry::formats_by_category_name("invalid_category").is_empty());
    }

    #[test]
    fn calc_and_writer_contain_expected() {
        let calc: Vec<&str> = FormatRegistry::formats_by_category(DocumentCategory::Calc)
            .iter()
            .map(|f| f.extension)
            .collect();
        for ext in ["xlsx", "xls", "ods", "csv"] {
            assert!(calc.contains(&ext), "{ext} not in calc formats");
        }

        let writer: Vec<&str> = FormatRegistry::formats_by_category(DocumentCategory::Writer)
            .iter()
            .map(|f| f.extension)
            .collect();
        for ext in ["docx", "doc", "odt", "rtf", "txt"] {
            assert!(writer.contains(&ext), "{ext} not in writer formats");
        }
    }

    #[test]
    fn format_info_serializes() {
        let info = FormatRegistry::get_format("docx")[0];
        let json = serde_json::to_value(info).unwrap();
        assert_eq!(json["extension"], "docx");
        assert_eq!(json["category"], "writer");
        assert_eq!(json["can_import"], true);
    }
}
