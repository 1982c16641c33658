//! Database feature injection for the generated server entry file.
//!
//! The entry file is treated as text with two declared insertion points:
//!
//! 1. **Import anchor**: the line `import dotenv from "dotenv";`. The
//!    connection-module import is inserted on the line right after it, with
//!    the same indentation.
//! 2. **Listener block**: the `app.listen(process.env.PORT || 5000, ...)`
//!    statement with its success-log callback. It is wrapped so the server
//!    only listens after `connectDB()` resolves.
//!
//! # Listener block delimiter
//!
//! A block starts at an `app.listen(` token (not preceded by an identifier
//! character or `.`) and ends at the parenthesis that balances its opening
//! `(`; string, template and comment contents are skipped while balancing.
//! Trailing whitespace plus one `;` are included when present. A block is
//! accepted when its whitespace-stripped text starts with
//! `app.listen(process.env.PORT||5000,` and contains `console.log(`.
//!
//! Exactly one accepted block and exactly one import anchor are required.
//! Anything else is a hard error; no edit is ever applied partially because
//! both edits run on an owned copy of the source.

use crate::domain::{error::DomainError, value_objects::Language};

/// Import line the entry file must contain exactly once.
pub const IMPORT_ANCHOR: &str = r#"import dotenv from "dotenv";"#;

/// Import inserted after [`IMPORT_ANCHOR`].
pub const DATABASE_IMPORT: &str = r#"import connectDB from "./db/index.js";"#;

/// Module specifier that marks a file as already wired.
const DATABASE_MODULE_SPECIFIER: &str = "./db/index.js";

/// Whitespace-free prefix an accepted listener block must start with.
const LISTENER_SIGNATURE: &str = "app.listen(process.env.PORT||5000,";

/// Human-readable form of the listener anchor for error messages.
const LISTENER_ANCHOR: &str = "app.listen(process.env.PORT || 5000, () => { console.log(...); });";

const LISTEN_TOKEN: &str = "app.listen(";

/// Source of the generated `src/db/index.<ext>` module.
pub fn database_module_source(language: Language) -> &'static str {
    match language {
        Language::JavaScript => JS_DATABASE_MODULE,
        Language::TypeScript => TS_DATABASE_MODULE,
    }
}

const JS_DATABASE_MODULE: &str = r#"import mongoose from "mongoose";

const connectDB = async () => {
    try {
        const connectionInstance = await mongoose.connect(`${process.env.MONGODB_URI}`);
        console.log(`✅ MongoDB connected successfully! Host: ${connectionInstance.connection.host}`);
    } catch (error) {
        console.log("MONGODB connection FAILED ", error);
        process.exit(1);
    }
}

export default connectDB;
"#;

const TS_DATABASE_MODULE: &str = r#"import mongoose from 'mongoose';

const connectDB = async (): Promise<void> => {
    try {
        const connectionInstance = await mongoose.connect(`${process.env.MONGODB_URI}`);
        console.log(`✅ MongoDB connected successfully! Host: ${connectionInstance.connection.host}`);
    } catch (error) {
        console.log("MONGODB connection FAILED ", error);
        process.exit(1);
    }
}

export default connectDB;
"#;

/// The two anchored edits that wire the database module into an entry file.
#[derive(Debug, Clone, Copy, Default)]
pub struct InjectionPlan;

impl InjectionPlan {
    pub const fn database() -> Self {
        Self
    }

    /// Apply both edits to `source` and return the patched text.
    ///
    /// `file` only labels errors. On error, `source` is untouched and nothing
    /// should be written.
    pub fn apply(&self, file: &str, source: &str) -> Result<String, DomainError> {
        if source.contains(DATABASE_MODULE_SPECIFIER) {
            return Err(DomainError::AlreadyInjected { file: file.into() });
        }

        let with_import = insert_import(file, source)?;
        wrap_listener(file, &with_import)
    }
}

// ── Import insertion ─────────────────────────────────────────────────────────

fn insert_import(file: &str, source: &str) -> Result<String, DomainError> {
    let mut matches = Vec::new();
    let mut offset = 0;
    for line in source.split_inclusive('\n') {
        if line.trim() == IMPORT_ANCHOR {
            matches.push((offset, line));
        }
        offset += line.len();
    }

    let (start, line) = match matches.as_slice() {
        [single] => *single,
        [] => {
            return Err(DomainError::AnchorNotFound {
                file: file.into(),
                anchor: IMPORT_ANCHOR.into(),
            });
        }
        many => {
            return Err(DomainError::AmbiguousAnchor {
                file: file.into(),
                anchor: IMPORT_ANCHOR.into(),
                count: many.len(),
            });
        }
    };

    let indent = leading_whitespace(line);
    let end = start + line.len();
    let mut patched = String::with_capacity(source.len() + DATABASE_IMPORT.len() + 2);
    patched.push_str(&source[..end]);
    if line.ends_with('\n') {
        let newline = if line.ends_with("\r\n") { "\r\n" } else { "\n" };
        patched.push_str(indent);
        patched.push_str(DATABASE_IMPORT);
        patched.push_str(newline);
    } else {
        // Anchor is the last line and has no terminator.
        patched.push('\n');
        patched.push_str(indent);
        patched.push_str(DATABASE_IMPORT);
    }
    patched.push_str(&source[end..]);
    Ok(patched)
}

// ── Listener wrapping ────────────────────────────────────────────────────────

fn wrap_listener(file: &str, source: &str) -> Result<String, DomainError> {
    let blocks = find_listener_blocks(source);
    let (start, end) = match blocks.as_slice() {
        [single] => *single,
        [] => {
            return Err(DomainError::AnchorNotFound {
                file: file.into(),
                anchor: LISTENER_ANCHOR.into(),
            });
        }
        many => {
            return Err(DomainError::AmbiguousAnchor {
                file: file.into(),
                anchor: LISTENER_ANCHOR.into(),
                count: many.len(),
            });
        }
    };

    let newline = if source.contains("\r\n") { "\r\n" } else { "\n" };
    let line_start = source[..start].rfind('\n').map_or(0, |i| i + 1);
    let prefix = &source[line_start..start];
    let indent = if prefix.chars().all(char::is_whitespace) {
        prefix
    } else {
        ""
    };

    let block = source[start..end].trim_end_matches(['\r', '\n']);
    let mut body = String::new();
    for (i, line) in block.split('\n').enumerate() {
        if i > 0 {
            body.push('\n');
        }
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        if i == 0 {
            body.push_str(indent);
        }
        body.push_str("    ");
        body.push_str(line);
    }
    let body = body.replace('\n', newline);

    let replacement = [
        "connectDB()".to_string(),
        format!("{indent}.then(() => {{"),
        body,
        format!("{indent}}})"),
        format!("{indent}.catch((err) => {{"),
        format!(r#"{indent}    console.log("MONGO db connection failed! ", err);"#),
        format!("{indent}    process.exit(1);"),
        format!("{indent}}});"),
    ]
    .join(newline);

    let mut patched = String::with_capacity(source.len() + replacement.len());
    patched.push_str(&source[..start]);
    patched.push_str(&replacement);
    patched.push_str(&source[end..]);
    Ok(patched)
}

/// Byte ranges of every accepted listener block in `source`.
///
/// A candidate must sit in code (not inside a literal or comment) and start
/// its line, so `const server = app.listen(...)` is never rewritten.
fn find_listener_blocks(source: &str) -> Vec<(usize, usize)> {
    let bytes = source.as_bytes();
    let code = code_mask(bytes);
    let mut blocks = Vec::new();
    let mut search = 0;

    while let Some(found) = source[search..].find(LISTEN_TOKEN) {
        let start = search + found;
        let open = start + LISTEN_TOKEN.len() - 1;

        if !code[start] || !starts_statement(source, start) {
            search = open;
            continue;
        }

        let Some(close) = matching_paren(bytes, &code, open) else {
            search = open;
            continue;
        };

        let mut end = close + 1;
        let after_ws = end
            + bytes[end..]
                .iter()
                .take_while(|&&b| b == b' ' || b == b'\t')
                .count();
        if bytes.get(after_ws) == Some(&b';') {
            end = after_ws + 1;
        }

        if is_listener_block(&source[start..end]) {
            blocks.push((start, end));
        }
        search = end;
    }

    blocks
}

/// Only whitespace between the start of the line and `at`.
fn starts_statement(source: &str, at: usize) -> bool {
    let line_start = source[..at].rfind('\n').map_or(0, |i| i + 1);
    source[line_start..at].chars().all(char::is_whitespace)
}

fn is_listener_block(block: &str) -> bool {
    let compact: String = block.chars().filter(|c| !c.is_whitespace()).collect();
    compact.starts_with(LISTENER_SIGNATURE) && compact.contains("console.log(")
}

/// Index of the `)` balancing the `(` at `open`, counting only code bytes.
fn matching_paren(bytes: &[u8], code: &[bool], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for i in open..bytes.len() {
        if !code[i] {
            continue;
        }
        match bytes[i] {
            b'(' => depth += 1,
            b')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// `true` for every byte that is plain code: outside string, character and
/// template literals and outside comments. Delimiters count as non-code.
fn code_mask(bytes: &[u8]) -> Vec<bool> {
    #[derive(Clone, Copy, PartialEq)]
    enum State {
        Code,
        Quoted(u8),
        LineComment,
        BlockComment,
    }

    let mut mask = vec![false; bytes.len()];
    let mut state = State::Code;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        match state {
            State::Code => match b {
                b'"' | b'\'' | b'`' => state = State::Quoted(b),
                b'/' if bytes.get(i + 1) == Some(&b'/') => {
                    state = State::LineComment;
                    i += 1;
                }
                b'/' if bytes.get(i + 1) == Some(&b'*') => {
                    state = State::BlockComment;
                    i += 1;
                }
                _ => mask[i] = true,
            },
            State::Quoted(quote) => {
                if b == b'\\' {
                    i += 1;
                } else if b == quote {
                    state = State::Code;
                }
            }
            State::LineComment => {
                if b == b'\n' {
                    state = State::Code;
                    mask[i] = true;
                }
            }
            State::BlockComment => {
                if b == b'*' && bytes.get(i + 1) == Some(&b'/') {
                    state = State::Code;
                    i += 1;
                }
            }
        }
        i += 1;
    }

    mask
}

fn leading_whitespace(line: &str) -> &str {
    let trimmed = line.trim_start();
    &line[..line.len() - trimmed.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    const SERVER: &str = r#"import express from "express";
import cors from "cors";
import dotenv from "dotenv";

dotenv.config({
    path: './.env'
});

const app = express();

app.use(express.json({limit: "16kb"}));

// routes declaration


app.listen(process.env.PORT || 5000, () => {
    console.log(`⚙️ Server is running at port : ${process.env.PORT || 5000}`);
});"#;

    fn apply(source: &str) -> Result<String, DomainError> {
        InjectionPlan::database().apply("src/server.js", source)
    }

    #[test]
    fn inserts_import_after_anchor() {
        let patched = apply(SERVER).unwrap();
        assert!(patched.contains(&format!("{IMPORT_ANCHOR}\n{DATABASE_IMPORT}\n")));
        assert_eq!(patched.matches(DATABASE_IMPORT).count(), 1);
    }

    #[test]
    fn wraps_listener_in_connect_sequence() {
        let patched = apply(SERVER).unwrap();
        let expected = r#"connectDB()
.then(() => {
    app.listen(process.env.PORT || 5000, () => {
        console.log(`⚙️ Server is running at port : ${process.env.PORT || 5000}`);
    });
})
.catch((err) => {
    console.log("MONGO db connection failed! ", err);
    process.exit(1);
});"#;
        assert!(patched.ends_with(expected), "got:\n{patched}");
        assert_eq!(patched.matches("connectDB()").count(), 1);
        assert!(!patched.contains("app.listen(process.env.PORT || 5000, () => {\n    console.log"));
    }

    #[test]
    fn leaves_unrelated_code_untouched() {
        let patched = apply(SERVER).unwrap();
        assert!(patched.starts_with("import express from \"express\";\nimport cors"));
        assert!(patched.contains("app.use(express.json({limit: \"16kb\"}));\n\n// routes declaration"));
    }

    #[test]
    fn tolerates_reformatted_listener() {
        let source = "import dotenv from \"dotenv\";\nconst app = express();\n  app.listen( process.env.PORT||5000 ,\n() =>\n{ console.log(\"up (ready)\") }\n) ;\nmodule.exports = app;\n";
        let patched = apply(source).unwrap();
        assert!(patched.contains("  connectDB()\n  .then(() => {\n      app.listen( process.env.PORT||5000 ,"));
        assert!(patched.contains("  });\nmodule.exports = app;\n"));
    }

    #[test]
    fn skips_parens_inside_strings_and_comments() {
        let source = "import dotenv from \"dotenv\";\napp.listen(process.env.PORT || 5000, () => {\n    // closing ) in a comment\n    console.log(\")\" + `)`);\n});\n";
        let patched = apply(source).unwrap();
        assert!(patched.ends_with("    process.exit(1);\n});\n"));
    }

    #[test]
    fn missing_import_anchor_fails() {
        let source = SERVER.replace(IMPORT_ANCHOR, "import 'dotenv/config';");
        assert!(matches!(
            apply(&source),
            Err(DomainError::AnchorNotFound { anchor, .. }) if anchor == IMPORT_ANCHOR
        ));
    }

    #[test]
    fn missing_listener_fails_loudly() {
        let source = SERVER.replace("app.listen(process.env.PORT || 5000", "app.listen(3000");
        assert!(matches!(
            apply(&source),
            Err(DomainError::AnchorNotFound { anchor, .. }) if anchor.starts_with("app.listen")
        ));
    }

    #[test]
    fn listener_without_log_callback_is_not_accepted() {
        let source = "import dotenv from \"dotenv\";\napp.listen(process.env.PORT || 5000, onReady);\n";
        assert!(matches!(apply(source), Err(DomainError::AnchorNotFound { .. })));
    }

    #[test]
    fn duplicate_listeners_are_ambiguous() {
        let listener = "app.listen(process.env.PORT || 5000, () => {\n    console.log(`up`);\n});\n";
        let source = format!("import dotenv from \"dotenv\";\n{listener}{listener}");
        assert!(matches!(
            apply(&source),
            Err(DomainError::AmbiguousAnchor { count: 2, .. })
        ));
    }

    #[test]
    fn prefixed_identifier_is_not_a_listener() {
        let source = "import dotenv from \"dotenv\";\nmyapp.listen(process.env.PORT || 5000, () => {\n    console.log(`up`);\n});\n";
        assert!(matches!(apply(source), Err(DomainError::AnchorNotFound { .. })));
    }

    #[test]
    fn commented_out_listener_is_ignored() {
        let source = format!(
            "{SERVER}\n// app.listen(process.env.PORT || 5000, () => console.log(`old`));\n/* app.listen(process.env.PORT || 5000, () => {{ console.log(`older`); }}); */\n"
        );
        let patched = apply(&source).unwrap();
        assert_eq!(patched.matches("connectDB()").count(), 1);
        assert!(patched.contains("// app.listen(process.env.PORT || 5000, () => console.log(`old`));"));
    }

    #[test]
    fn listener_inside_a_string_is_ignored() {
        let source = format!(
            "{SERVER}\nconst doc = \"app.listen(process.env.PORT || 5000, () => console.log(1));\";\n"
        );
        assert_eq!(apply(&source).unwrap().matches("connectDB()").count(), 1);
    }

    #[test]
    fn listener_in_expression_position_is_not_rewritten() {
        let source = "import dotenv from \"dotenv\";\nconst server = app.listen(process.env.PORT || 5000, () => {\n    console.log(`up`);\n});\n";
        assert!(matches!(apply(source), Err(DomainError::AnchorNotFound { .. })));
    }

    #[test]
    fn second_injection_is_rejected() {
        let once = apply(SERVER).unwrap();
        assert!(matches!(
            apply(&once),
            Err(DomainError::AlreadyInjected { .. })
        ));
    }

    #[test]
    fn preserves_crlf_line_endings() {
        let source = SERVER.replace('\n', "\r\n");
        let patched = apply(&source).unwrap();
        assert!(patched.contains(&format!("{IMPORT_ANCHOR}\r\n{DATABASE_IMPORT}\r\n")));
        assert!(patched.contains("connectDB()\r\n.then(() => {\r\n"));
        assert!(!patched.replace("\r\n", "").contains('\n'));
    }

    #[test]
    fn database_module_exits_on_failure() {
        for language in Language::ALL {
            let source = database_module_source(language);
            assert!(source.contains("process.env.MONGODB_URI"));
            assert!(source.contains("process.exit(1)"));
            assert!(source.contains("export default connectDB;"));
        }
    }
}
