//! Token table printed by the dump mode

use crate::tokens::Token;

/// Render `line`, kind name and value columns, one token per row
pub fn render_token_table(tokens: &[Token]) -> String {
    let mut output = format!("{:<10} {:<10} \t {:<10}\n", "line", "token", "value");
    output.push_str(&"-".repeat(30));
    output.push('\n');

    for token in tokens {
        output.push_str(&render_row(token));
        output.push('\n');
    }

    output
}

fn render_row(token: &Token) -> String {
    if token.value().is_none() {
        format!("{:<10} {:<10}", token.line, token.kind.name())
    } else {
        format!(
            "{:<10} {:<10}\t {:<10}",
            token.line,
            token.kind.name(),
            token.value().to_string()
        )
    }
}
