use serde::{Deserialize, Serialize};

/// A starter file returned by the scaffolder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaffoldFile {
    pub path: String,
    pub contents: String,
}

impl ScaffoldFile {
    fn new(path: &str, contents: &str) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }
}

/// Which starter template to hand out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stack {
    Web,
    Api,
}

impl Stack {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Api => "api",
        }
    }
}

const BUILD_VERBS: &[&str] = &["build", "create", "make", "scaffold", "generate", "set up", "setup"];
const API_HINTS: &[&str] = &["api", "backend", "rest", "endpoint", "service"];

/// Keyword heuristic over the chat message. Returns the stack to scaffold
/// when the message reads like a build request, `None` otherwise.
pub fn detect_build_intent(message: &str) -> Option<Stack> {
    let lower = message.to_lowercase();
    if !BUILD_VERBS.iter().any(|v| lower.contains(v)) {
        return None;
    }
    if API_HINTS.iter().any(|h| lower.contains(h)) {
        Some(Stack::Api)
    } else {
        Some(Stack::Web)
    }
}

/// The hardcoded starter set for a stack. Static data, no generation logic.
pub fn starter_files(stack: Stack) -> Vec<ScaffoldFile> {
    match stack {
        Stack::Web => vec![
            ScaffoldFile::new(
                "index.html",
                "<!doctype html>\n<html>\n<head>\n  <meta charset=\"utf-8\" />\n  <title>New Project</title>\n  <link rel=\"stylesheet\" href=\"styles.css\" />\n</head>\n<body>\n  <div id=\"app\"></div>\n  <script src=\"app.js\"></script>\n</body>\n</html>\n",
            ),
            ScaffoldFile::new(
                "styles.css",
                "* { box-sizing: border-box; }\nbody { font-family: system-ui, sans-serif; margin: 0; }\n#app { padding: 2rem; }\n",
            ),
            ScaffoldFile::new(
                "app.js",
                "const app = document.getElementById('app');\napp.textContent = 'Hello from your new project';\n",
            ),
            ScaffoldFile::new(
                "README.md",
                "# New Project\n\nGenerated starter. Open index.html to get going.\n",
            ),
        ],
        Stack::Api => vec![
            ScaffoldFile::new(
                "server.js",
                "const http = require('http');\n\nconst server = http.createServer((req, res) => {\n  res.setHeader('content-type', 'application/json');\n  res.end(JSON.stringify({ ok: true }));\n});\n\nserver.listen(process.env.PORT || 3000);\n",
            ),
            ScaffoldFile::new(
                "package.json",
                "{\n  \"name\": \"new-api\",\n  \"version\": \"0.1.0\",\n  \"scripts\": { \"start\": \"node server.js\" }\n}\n",
            ),
            ScaffoldFile::new(
                "README.md",
                "# New API\n\nGenerated starter. Run `npm start`.\n",
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_question_is_not_build_intent() {
        assert_eq!(detect_build_intent("what can you do?"), None);
        assert_eq!(detect_build_intent("hello there"), None);
    }

    #[test]
    fn build_verbs_trigger_web_stack() {
        assert_eq!(detect_build_intent("build me a todo app"), Some(Stack::Web));
        assert_eq!(detect_build_intent("Create a landing page"), Some(Stack::Web));
        assert_eq!(detect_build_intent("scaffold a new site"), Some(Stack::Web));
    }

    #[test]
    fn api_hints_select_api_stack() {
        assert_eq!(detect_build_intent("build a rest api"), Some(Stack::Api));
        assert_eq!(
            detect_build_intent("generate a backend for my shop"),
            Some(Stack::Api)
        );
    }

    #[test]
    fn detection_is_case_insensitive() {
        assert_eq!(detect_build_intent("BUILD AN API"), Some(Stack::Api));
    }

    #[test]
    fn web_starter_has_entry_point() {
        let files = starter_files(Stack::Web);
        assert!(files.iter().any(|f| f.path == "index.html"));
        assert!(files.iter().all(|f| !f.contents.is_empty()));
    }

    #[test]
    fn api_starter_has_entry_point() {
        let files = starter_files(Stack::Api);
        assert!(files.iter().any(|f| f.path == "server.js"));
        assert!(files.iter().all(|f| !f.contents.is_empty()));
    }

    #[test]
    fn stack_names() {
        assert_eq!(Stack::Web.name(), "web");
        assert_eq!(Stack::Api.name(), "api");
    }
}
