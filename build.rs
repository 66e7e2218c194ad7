use std::collections::HashSet;
use std::path::Path;

const SECTIONS: [&str; 4] = ["facilities", "licenses", "certifications", "job_titles"];

fn main() {
    let catalog_path = Path::new("catalogs/healthcare_canonical.json");
    validate_catalog_file(catalog_path);
    set_build_dependencies();
}

fn validate_catalog_file(catalog_path: &Path) {
    // Ensure catalog exists at build time
    assert!(
        catalog_path.exists(),
        "\n\nCATALOG BUILD ERROR: File not found\n\
         Path: {}\n\
         Please create the catalog file before building.\n",
        catalog_path.display()
    );

    let catalog_contents = std::fs::read_to_string(catalog_path).unwrap_or_else(|e| {
        panic!(
            "\n\nCATALOG BUILD ERROR: Failed to read file\n\
             Path: {}\n\
             Error: {e}\n",
            catalog_path.display()
        );
    });

    let catalog: serde_json::Value = serde_json::from_str(&catalog_contents).unwrap_or_else(|e| {
        panic!(
            "\n\nCATALOG BUILD ERROR: Invalid JSON\n\
             Path: {}\n\
             Error: {e}\n\
             Hint: Check for missing commas, brackets, or invalid syntax.\n",
            catalog_path.display()
        );
    });

    validate_catalog_structure(&catalog);
}

fn validate_catalog_structure(catalog: &serde_json::Value) {
    assert!(
        catalog.is_object(),
        "\n\nCATALOG BUILD ERROR: Root must be a JSON object\n\
         Got: {catalog}\n"
    );

    assert!(
        catalog.get("version").and_then(|v| v.as_str()).is_some(),
        "\n\nCATALOG BUILD ERROR: Missing 'version' field\n"
    );

    let mut total_entries = 0;
    for section in SECTIONS {
        let Some(value) = catalog.get(section) else {
            continue;
        };
        let entries = value.as_array().unwrap_or_else(|| {
            panic!(
                "\n\nCATALOG BUILD ERROR: '{section}' must be an array\n\
                 Got: {value}\n"
            );
        });
        validate_entries(section, entries);
        total_entries += entries.len();
    }

    println!("cargo:warning=Validated catalog: {total_entries} canonical entries");
}

fn validate_entries(section: &str, entries: &[serde_json::Value]) {
    let mut seen: HashSet<&str> = HashSet::new();

    for (i, entry) in entries.iter().enumerate() {
        let id = entry.get("id").and_then(|v| v.as_str()).unwrap_or_else(|| {
            panic!("\n\nCATALOG BUILD ERROR: '{section}' entry at index {i} missing 'id' field\n");
        });

        assert!(
            seen.insert(id),
            "\n\nCATALOG BUILD ERROR: Duplicate id '{id}' in '{section}'\n"
        );

        let name = entry.get("name").and_then(|v| v.as_str());
        assert!(
            name.is_some_and(|n| !n.trim().is_empty()),
            "\n\nCATALOG BUILD ERROR: '{section}' entry '{id}' (index {i}) missing or empty 'name' field\n"
        );

        if let Some(aliases) = entry.get("aliases") {
            assert!(
                aliases
                    .as_array()
                    .is_some_and(|a| a.iter().all(serde_json::Value::is_string)),
                "\n\nCATALOG BUILD ERROR: '{section}' entry '{id}' has non-string 'aliases'\n\
                 Aliases must be an array of strings.\n"
            );
        }
    }
}

fn set_build_dependencies() {
    // Tell cargo to rerun if catalog changes
    println!("cargo:rerun-if-changed=catalogs/healthcare_canonical.json");

    // Tell cargo to rerun if build.rs changes
    println!("cargo:rerun-if-changed=build.rs");
}
