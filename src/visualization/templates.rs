/// Embedded standalone page shell
pub const PAGE_TEMPLATE: &str = include_str!("../../templates/page.html");
