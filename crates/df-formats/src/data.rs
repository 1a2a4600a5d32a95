//! The format table.
//!
//! Entries are grouped by category. An extension may appear more than once
//! (e.g. `pdf` is exported by every document module, `html` is read by both
//! Writer and Calc), each time with the filter that module uses.

use crate::category::DocumentCategory::{self, *};
use crate::registry::FormatInfo;

const fn fmt(
    extension: &'static str,
    filter_name: &'static str,
    mime_type: Option<&'static str>,
    category: DocumentCategory,
    can_import: bool,
    can_export: bool,
) -> FormatInfo {
    FormatInfo {
        extension,
        filter_name,
        mime_type,
        category,
        can_import,
        can_export,
    }
}

pub(crate) static FORMATS: &[FormatInfo] = &[
    // Writer
    fmt("odt", "writer8", Some("application/vnd.oasis.opendocument.text"), Writer, true, true),
    fmt("ott", "writer8_template", Some("application/vnd.oasis.opendocument.text-template"), Writer, true, true),
    fmt("fodt", "OpenDocument Text Flat XML", Some("application/vnd.oasis.opendocument.text-flat-xml"), Writer, true, true),
    fmt("doc", "MS Word 97", Some("application/msword"), Writer, true, true),
    fmt("docx", "MS Word 2007 XML", Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document"), Writer, true, true),
    fmt("dotx", "MS Word 2007 XML Template", Some("application/vnd.openxmlformats-officedocument.wordprocessingml.template"), Writer, true, false),
    fmt("rtf", "Rich Text Format", Some("application/rtf"), Writer, true, true),
    fmt("txt", "Text", Some("text/plain"), Writer, true, true),
    fmt("html", "HTML (StarWriter)", Some("text/html"), Writer, true, true),
    fmt("epub", "EPUB", Some("application/epub+zip"), Writer, true, true),
    fmt("pdf", "writer_pdf_Export", Some("application/pdf"), Writer, false, true),
    fmt("md", "Text", Some("text/markdown"), Writer, true, false),
    fmt("pages", "Apple Pages", None, Writer, true, false),
    fmt("hwp", "writer_MIZI_Hwp_97", None, Writer, true, false),
    fmt("wpd", "WordPerfect", Some("application/vnd.wordperfect"), Writer, true, false),
    fmt("wri", "MS Write", None, Writer, true, false),
    fmt("abw", "AbiWord", Some("application/x-abiword"), Writer, true, false),
    fmt("lwp", "Lotus WordPro", None, Writer, true, false),
    fmt("pdb", "AportisDoc (Palm)", None, Writer, true, false),
    // Calc
    fmt("ods", "calc8", Some("application/vnd.oasis.opendocument.spreadsheet"), Calc, true, true),
    fmt("ots", "calc8_template", Some("application/vnd.oasis.opendocument.spreadsheet-template"), Calc, true, true),
    fmt("fods", "OpenDocument Spreadsheet Flat XML", Some("application/vnd.oasis.opendocument.spreadsheet-flat-xml"), Calc, true, true),
    fmt("xls", "MS Excel 97", Some("application/vnd.ms-excel"), Calc, true, true),
    fmt("xlsx", "Calc MS Excel 2007 XML", Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"), Calc, true, true),
    fmt("xltx", "Calc MS Excel 2007 XML Template", Some("application/vnd.openxmlformats-officedocument.spreadsheetml.template"), Calc, true, false),
    fmt("csv", "Text - txt - csv (StarCalc)", Some("text/csv"), Calc, true, true),
    fmt("tsv", "Text - txt - csv (StarCalc)", Some("text/tab-separated-values"), Calc, true, true),
    fmt("html", "HTML (StarCalc)", Some("text/html"), Calc, true, true),
    fmt("pdf", "calc_pdf_Export", Some("application/pdf"), Calc, false, true),
    fmt("numbers", "Apple Numbers", None, Calc, true, false),
    fmt("gnumeric", "Gnumeric Spreadsheet", Some("application/x-gnumeric"), Calc, true, false),
    fmt("dif", "DIF", None, Calc, true, true),
    fmt("dbf", "dBASE", None, Calc, true, true),
    fmt("slk", "SYLK", None, Calc, true, true),
    fmt("wk1", "Lotus 1-2-3", None, Calc, true, false),
    // Impress
    fmt("odp", "impress8", Some("application/vnd.oasis.opendocument.presentation"), Impress, true, true),
    fmt("otp", "impress8_template", Some("application/vnd.oasis.opendocument.presentation-template"), Impress, true, true),
    fmt("fodp", "OpenDocument Presentation Flat XML", Some("application/vnd.oasis.opendocument.presentation-flat-xml"), Impress, true, true),
    fmt("ppt", "MS PowerPoint 97", Some("application/vnd.ms-powerpoint"), Impress, true, true),
    fmt("pptx", "Impress MS PowerPoint 2007 XML", Some("application/vnd.openxmlformats-officedocument.presentationml.presentation"), Impress, true, true),
    fmt("potx", "Impress MS PowerPoint 2007 XML Template", Some("application/vnd.openxmlformats-officedocument.presentationml.template"), Impress, true, false),
    fmt("pps", "MS PowerPoint 97 AutoPlay", Some("application/vnd.ms-powerpoint"), Impress, true, true),
    fmt("ppsx", "Impress MS PowerPoint 2007 XML AutoPlay", Some("application/vnd.openxmlformats-officedocument.presentationml.slideshow"), Impress, true, true),
    fmt("pdf", "impress_pdf_Export", Some("application/pdf"), Impress, false, true),
    fmt("key", "Apple Keynote", None, Impress, true, false),
    fmt("sxi", "StarOffice XML (Impress)", None, Impress, true, false),
    // Draw
    fmt("odg", "draw8", Some("application/vnd.oasis.opendocument.graphics"), Draw, true, true),
    fmt("otg", "draw8_template", Some("application/vnd.oasis.opendocument.graphics-template"), Draw, true, false),
    fmt("fodg", "OpenDocument Drawing Flat XML", Some("application/vnd.oasis.opendocument.graphics-flat-xml"), Draw, true, true),
    fmt("pdf", "draw_pdf_Export", Some("application/pdf"), Draw, false, true),
    fmt("svg", "draw_svg_Export", Some("image/svg+xml"), Draw, false, true),
    fmt("vsd", "Visio Document", Some("application/vnd.visio"), Draw, true, false),
    fmt("vsdx", "Visio Document", Some("application/vnd.ms-visio.drawing.main+xml"), Draw, true, false),
    fmt("pub", "Microsoft Publisher", None, Draw, true, false),
    fmt("cdr", "CorelDRAW", Some("application/vnd.corel-draw"), Draw, true, false),
    fmt("wpg", "WordPerfect Graphics", None, Draw, true, false),
    fmt("cmx", "Corel Presentation Exchange", None, Draw, true, false),
    fmt("sxd", "StarOffice XML (Draw)", None, Draw, true, false),
    // Math
    fmt("odf", "math8", Some("application/vnd.oasis.opendocument.formula"), Math, true, true),
    fmt("mml", "MathML XML (Math)", Some("application/mathml+xml"), Math, true, true),
    fmt("sxm", "StarOffice XML (Math)", None, Math, true, false),
    fmt("pdf", "math_pdf_Export", Some("application/pdf"), Math, false, true),
    // Graphic export
    fmt("jpg", "jpg", Some("image/jpeg"), Graphic, false, true),
    fmt("jpeg", "jpeg", Some("image/jpeg"), Graphic, false, true),
    fmt("png", "png", Some("image/png"), Graphic, false, true),
    fmt("svg", "svg", Some("image/svg+xml"), Graphic, false, true),
    fmt("webp", "webp", Some("image/webp"), Graphic, false, true),
];
