//! Fenced code block language tags.

use once_cell::sync::Lazy;
use std::collections::HashMap;

static LANGUAGE_BY_EXTENSION: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("py", "python"),
        ("js", "javascript"),
        ("mjs", "javascript"),
        ("cjs", "javascript"),
        ("ts", "typescript"),
        ("jsx", "jsx"),
        ("tsx", "tsx"),
        ("html", "html"),
        ("htm", "html"),
        ("css", "css"),
        ("scss", "scss"),
        ("json", "json"),
        ("md", "markdown"),
        ("java", "java"),
        ("c", "c"),
        ("h", "c"),
        ("cpp", "cpp"),
        ("cc", "cpp"),
        ("cxx", "cpp"),
        ("hpp", "cpp"),
        ("cs", "csharp"),
        ("go", "go"),
        ("rs", "rust"),
        ("php", "php"),
        ("rb", "ruby"),
        ("swift", "swift"),
        ("kt", "kotlin"),
        ("kts", "kotlin"),
        ("scala", "scala"),
        ("sh", "shell"),
        ("bash", "bash"),
        ("zsh", "zsh"),
        ("ps1", "powershell"),
        ("yml", "yaml"),
        ("yaml", "yaml"),
        ("toml", "toml"),
        ("ini", "ini"),
        ("xml", "xml"),
        ("sql", "sql"),
        ("lua", "lua"),
        ("dockerfile", "dockerfile"),
    ]
    .into_iter()
    .collect()
});

static LANGUAGE_BY_FILE_NAME: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("dockerfile", "dockerfile"),
        ("makefile", "makefile"),
        ("cmakelists.txt", "cmake"),
    ]
    .into_iter()
    .collect()
});

/// Returns the fenced block tag for a file, or `""` when the type is unknown.
///
/// The extension is looked up first, then the whole file name, both
/// case-insensitively.
#[must_use]
pub fn language_tag(file_name: &str) -> &'static str {
    let lower = file_name.to_lowercase();

    let by_extension = lower
        .rsplit_once('.')
        .filter(|(stem, _)| !stem.is_empty())
        .and_then(|(_, ext)| LANGUAGE_BY_EXTENSION.get(ext));

    by_extension
        .or_else(|| LANGUAGE_BY_FILE_NAME.get(lower.as_str()))
        .copied()
        .unwrap_or("")
}
