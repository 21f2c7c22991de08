use crate::analysis::analyze;
use crate::chat::Message;
use crate::core::error::AssistantError;
use crate::language::Language;

const CODE_KEYWORDS: [&str; 4] = ["code", "function", "algorithm", "write"];

pub fn system_prompt(language: Language) -> String {
    format!(
        "You are an expert {} coding assistant. Generate clean, well-commented code based on the user's request. Always include the complete code with proper syntax and explain your approach.",
        language.as_str()
    )
}

pub fn is_code_request(input: &str) -> bool {
    let lowered = input.to_lowercase();
    CODE_KEYWORDS.iter().any(|keyword| lowered.contains(keyword))
}

/// Identifier made of the input's ASCII letters, lowercased.
pub fn slug(input: &str) -> String {
    let slug: String = input
        .chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if slug.is_empty() {
        "solution".to_string()
    } else {
        slug
    }
}

fn pascal(slug: &str) -> String {
    let mut chars = slug.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

pub fn sample_code(input: &str, language: Language) -> String {
    let name = slug(input);
    let lang = language.as_str();
    match language {
        Language::Python => format!(
            r#"def {name}():
    """
    Describe what this function does.
    """
    print("Hello from {lang}!")

    return {{
        "success": True,
        "message": "Function executed successfully"
    }}

# Usage
if __name__ == "__main__":
    result = {name}()
    print(result)"#
        ),
        Language::TypeScript => {
            let result_type = format!("{}Result", pascal(&name));
            format!(
                r#"interface {result_type} {{
  success: boolean;
  message: string;
}}

function {name}(): {result_type} {{
  // Implement your logic here
  console.log("Hello from {lang}!");

  return {{
    success: true,
    message: "Function executed successfully"
  }};
}}

// Usage
const result: {result_type} = {name}();
console.log(result);"#
            )
        }
        Language::Rust => format!(
            r#"#[derive(Debug)]
struct Outcome {{
    success: bool,
    message: String,
}}

fn {name}() -> Outcome {{
    // Implement your logic here
    println!("Hello from {lang}!");

    Outcome {{
        success: true,
        message: "Function executed successfully".to_string(),
    }}
}}

fn main() {{
    let result = {name}();
    println!("{{:?}}", result);
}}"#
        ),
        _ => format!(
            r#"function {name}() {{
  // Implement your logic here
  console.log("Hello from {lang}!");

  return {{
    success: true,
    message: "Function executed successfully"
  }};
}}

// Usage
const result = {name}();
console.log(result);"#
        ),
    }
}

/// Locally generated reply for the no-credential route.
pub fn simulated_reply(input: &str, language: Language) -> Message {
    if is_code_request(input) {
        let code = sample_code(input, language);
        let analysis = analyze(&code, language);
        let content = format!(
            "I'll help you with that! Here's a solution using {}:\n\n{}",
            language.as_str(),
            code
        );
        Message::assistant(content)
            .with_code(code, language)
            .with_analysis(analysis)
    } else {
        Message::assistant(format!(
            "I understand you're asking about: \"{}\"\n\nThis is a simulated response. Add your API key for real completions.",
            input
        ))
    }
}

pub fn enterprise_reply(
    model: &str,
    language: Language,
    outcome: &Result<String, AssistantError>,
) -> Message {
    match outcome {
        Ok(text) => {
            let message = Message::assistant(format!("Here's your code generated by {}:\n\n", model))
                .with_code(text.as_str(), language);
            match message.code.as_deref() {
                Some(code) => {
                    let analysis = analyze(code, language);
                    message.with_analysis(analysis)
                }
                None => message,
            }
        }
        Err(err) => Message::assistant(format!(
            "❌ **Error**: {}\n\nPlease check your API key and try again.",
            err
        )),
    }
}

pub fn direct_reply(input: &str, outcome: &Result<String, AssistantError>) -> Message {
    match outcome {
        Ok(text) => Message::assistant(text.as_str()),
        Err(_) => Message::assistant(format!(
            "I understand you're asking about: \"{}\"\n\nThis is a fallback response. Please check your API key configuration.",
            input
        )),
    }
}
