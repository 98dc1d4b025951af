use std::fs;

const CONFIG_PATH: &str = "src/default_config.toml";

fn main() {
    println!("cargo:rerun-if-changed={}", CONFIG_PATH);

    let content = fs::read_to_string(CONFIG_PATH).expect("Failed to read default_config.toml");

    // Catch syntax errors before they reach Config::compiled_default
    let table = match content.parse::<toml::Table>() {
        Ok(table) => table,
        Err(e) => panic!("Invalid default_config.toml: {}", e),
    };

    for section in ["list", "output"] {
        if !table.get(section).is_some_and(toml::Value::is_table) {
            panic!("default_config.toml is missing the [{}] table", section);
        }
    }
}
