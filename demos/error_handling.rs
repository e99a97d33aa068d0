//! Demonstrate error handling for invalid configuration input.

fn main() {
    // Unterminated quoted string
    match webconf_rs::parse_str("server {\n\thost \"unclosed\n}\n") {
        Ok(_) => println!("Parsed OK (unexpected)"),
        Err(e) => {
            println!("Error: {e}");
            println!("  Kind: {:?}", e.kind);
            println!("  Location: line {}, column {}", e.line, e.column);
        }
    }

    println!();

    // Duplicate directive
    match webconf_rs::parse_str("server {\n\thost a;\n\thost b;\n}\n") {
        Ok(_) => println!("Parsed OK (unexpected)"),
        Err(e) => {
            println!("Error: {e}");
            println!("  Kind: {:?}", e.kind);
            println!("  Context:");
            print!("{}", e.context);
        }
    }
}
