use super::*;

fn request(language: &str) -> AutocompleteRequest {
    AutocompleteRequest {
        code_context: "import os".into(),
        cursor_line: 0,
        cursor_column: 9,
        language: language.into(),
    }
}

#[tokio::test]
async fn static_completer_ignores_context() {
    let completer = StaticCompleter::new("print('Hello World')");
    assert_eq!(completer.complete(&request("python")).await, "print('Hello World')");
    assert_eq!(completer.complete(&request("cobol")).await, "print('Hello World')");
}
