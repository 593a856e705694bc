/// The staff member a document bundle is generated for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffIdentity {
    /// Name as printed on the documents.
    pub display_name: String,
    /// Name used as the file-name prefix for every generated document.
    pub safe_name: String,
}

impl StaffIdentity {
    pub fn new(display_name: &str) -> Self {
        let display_name = display_name.trim().to_string();
        let safe_name = safe_file_stem(&display_name);
        Self {
            display_name,
            safe_name,
        }
    }
}

/// Collapses whitespace runs to `_` and replaces path separators so the name
/// can never escape the output directory.
fn safe_file_stem(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            other => other,
        })
        .collect()
}
