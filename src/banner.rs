// src/banner.rs

/// Prints the application startup banner to the console.
pub fn print_banner() {
    let banner = r#"
          _
 _ __ ___| | _____   ____ _ _ __   ___ ___
| '__/ _ \ |/ _ \ \ / / _` | '_ \ / __/ _ \
| | |  __/ |  __/\ V / (_| | | | | (_|  __/
|_|  \___|_|\___| \_/ \__,_|_| |_|\___\___|

    LLM Content Relevance Evaluator
"#;
    println!("{}", banner);
}
