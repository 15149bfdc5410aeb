use crate::compiler::fragment::Fragment;
use crate::model::IndexHandle;

/// Record-count widget over an ungrouped rollup of the whole index
pub fn compile_summary(index: &IndexHandle) -> Fragment {
    let body = format!(
        "var all = {cf}.groupAll();\n\
         element.append('<div id=\"dc-' + displayId + '-count\"><strong class=\"filter-count\">?</strong> selected ' +\n\
         \x20              'out of <strong class=\"total-count\">?</strong> records</div>' +\n\
         \x20              '<div style=\"clear: both;\"></div>');\n\
         var count = dc.dataCount(\"#dc-\" + displayId + \"-count\");\n\
         count.dimension({cf}).group(all);",
        cf = index
    );
    Fragment::new("Summary", None, body)
}
