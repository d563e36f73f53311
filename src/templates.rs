//! Content pools for the synthetic history generator.

use std::path::Path;

/// Kind of placeholder file the generator can fabricate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Python,
    JavaScript,
    Markdown,
    Json,
    Yaml,
    Text,
}

impl FileKind {
    pub const ALL: [FileKind; 6] = [
        FileKind::Python,
        FileKind::JavaScript,
        FileKind::Markdown,
        FileKind::Json,
        FileKind::Yaml,
        FileKind::Text,
    ];

    pub fn extension(self) -> &'static str {
        match self {
            FileKind::Python => ".py",
            FileKind::JavaScript => ".js",
            FileKind::Markdown => ".md",
            FileKind::Json => ".json",
            FileKind::Yaml => ".yml",
            FileKind::Text => ".txt",
        }
    }

    /// Templates with `{name}` and `{desc}` placeholders. Never empty.
    pub fn templates(self) -> &'static [&'static str] {
        match self {
            FileKind::Python => &[
                "def {name}():\n    \"\"\"{desc}\"\"\"\n    pass\n",
                "class {name}:\n    \"\"\"{desc}\"\"\"\n    def __init__(self):\n        self.value = None\n",
                "import os\nimport sys\n\n# {desc}\n",
            ],
            FileKind::JavaScript => &[
                "function {name}() {\n    // {desc}\n    return null;\n}\n",
                "const {name} = () => {\n    // {desc}\n};\n",
                "// {desc}\nmodule.exports = {};\n",
            ],
            FileKind::Markdown => &[
                "# {name}\n\n{desc}\n",
                "## {name}\n\n{desc}\n\n## Details\n\nSome information here.\n",
            ],
            FileKind::Json => &[
                "{\n    \"name\": \"{name}\",\n    \"description\": \"{desc}\",\n    \"version\": \"1.0.0\"\n}\n",
            ],
            FileKind::Yaml => &["name: {name}\ndescription: {desc}\nversion: 1.0.0\n"],
            FileKind::Text => &["{name}\n{desc}\n"],
        }
    }
}

/// Fills `{name}` and `{desc}` in `template`.
pub fn render(template: &str, name: &str, desc: &str) -> String {
    template.replace("{name}", name).replace("{desc}", desc)
}

/// Name substituted into a template: the file name without its extension.
pub fn derive_name(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

pub const DESCRIPTIONS: [&str; 5] = [
    "Utility function",
    "Helper class",
    "Configuration",
    "Documentation",
    "Test file",
];

/// Directories new files are created in.
pub const DIRECTORIES: [&str; 4] = ["src", "docs", "config", "scripts"];

/// Stems for new file names.
pub const STEMS: [&str; 7] = ["util", "helper", "main", "config", "test", "api", "service"];

/// Files created before the first commit.
pub const SEED_FILES: [(&str, FileKind); 4] = [
    ("README.md", FileKind::Markdown),
    ("src/main.py", FileKind::Python),
    ("config/settings.json", FileKind::Json),
    ("scripts/run.sh", FileKind::Text),
];

pub const COMMIT_MESSAGES: [&str; 30] = [
    "Update configuration",
    "Fix minor bugs",
    "Refactor code",
    "Add new features",
    "Update documentation",
    "Improve performance",
    "Code cleanup",
    "Add tests",
    "Update dependencies",
    "Fix typos",
    "Optimize code",
    "Add comments",
    "Update README",
    "Fix formatting",
    "Add utility functions",
    "Update config files",
    "Improve error handling",
    "Add logging",
    "Update scripts",
    "Code review fixes",
    "Add new module",
    "Update API",
    "Fix security issues",
    "Add validation",
    "Update styles",
    "Improve UI",
    "Add examples",
    "Update translations",
    "Fix memory leak",
    "Add caching",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_keeps_literal_braces() {
        let out = render(FileKind::JavaScript.templates()[0], "helper3", "Helper class");
        assert_eq!(
            out,
            "function helper3() {\n    // Helper class\n    return null;\n}\n"
        );
    }

    #[test]
    fn json_template_renders_valid_json() {
        let out = render(FileKind::Json.templates()[0], "settings", "Configuration");
        let v: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["name"], "settings");
        assert_eq!(v["description"], "Configuration");
    }

    #[test]
    fn every_kind_has_templates_with_placeholders() {
        for kind in FileKind::ALL {
            assert!(!kind.templates().is_empty());
            for t in kind.templates() {
                assert!(t.contains("{desc}") || t.contains("{name}"));
            }
        }
    }

    #[test]
    fn derived_name_drops_extension() {
        assert_eq!(derive_name("src/main.py"), "main");
        assert_eq!(derive_name("README.md"), "README");
    }
}
