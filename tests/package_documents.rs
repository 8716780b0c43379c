//! Library-level tests of the generated package documents.

use std::fs;

use serde_json::Value;
use tempfile::TempDir;

use godocjson::{document_directory, generate, Config, ExtractMode};

const SHAPES_GO: &str = r#"// Package shapes computes areas.
//
// BUG(ann): Areas overflow for huge sizes.
package shapes

import (
	"fmt"
	"math"
)

// Unit of measurement.
type Unit int

// Supported units.
const (
	Meter Unit = iota
	Foot
	inch
)

// Epsilon is the comparison tolerance.
var Epsilon, delta = 1e-9, 2.0

// Shape has an area.
type Shape interface {
	Area() float64
	fmt.Stringer
}

// Circle is round.
type Circle struct {
	Radius float64
	unit   Unit
}

// NewCircle returns a circle of radius r.
func NewCircle(r float64, units ...Unit) *Circle { return &Circle{Radius: r} }

// Area of the circle.
func (c *Circle) Area() float64 { return math.Pi * c.Radius * c.Radius }

// TODO(bob): support ellipses.
func (c Circle) String() string { return "circle" }

// Sum adds the areas.
func Sum(shapes []Shape, scale map[string]float64, f func(int) error) float64 { return 0 }
"#;

const LABELED_GO: &str = r#"package shapes

type base struct{}

// Label names a shape.
func (b *base) Label() string { return "" }

// Labeled carries a label.
type Labeled struct {
	*base
	Circle
}
"#;

fn fixture() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("shapes.go"), SHAPES_GO).unwrap();
    fs::write(temp_dir.path().join("labeled.go"), LABELED_GO).unwrap();
    temp_dir
}

fn document(config: &Config) -> Value {
    let mut out = Vec::new();
    assert_eq!(generate(config, &mut out).unwrap(), 1);
    serde_json::from_slice(&out).unwrap()
}

fn find<'a>(list: &'a Value, name: &str) -> &'a Value {
    list.as_array()
        .unwrap()
        .iter()
        .find(|entry| entry["name"] == name)
        .unwrap_or_else(|| panic!("{} not found in {}", name, list))
}

#[test]
fn test_package_header() {
    let temp_dir = fixture();
    let pkg = document(&Config::new(temp_dir.path()));

    assert_eq!(pkg["name"], "shapes");
    assert!(pkg["doc"].as_str().unwrap().starts_with("Package shapes computes areas."));
    assert_eq!(pkg["imports"], serde_json::json!(["fmt", "math"]));
    let filenames: Vec<&str> = pkg["filenames"].as_array().unwrap().iter().map(|f| f.as_str().unwrap()).collect();
    assert!(filenames[0].ends_with("labeled.go"));
    assert!(filenames[1].ends_with("shapes.go"));
}

#[test]
fn test_notes_and_bugs() {
    let temp_dir = fixture();
    let pkg = document(&Config::new(temp_dir.path()));

    assert_eq!(pkg["bugs"], serde_json::json!(["Areas overflow for huge sizes.\n"]));
    assert_eq!(pkg["notes"]["BUG"][0]["uid"], "ann");
    assert_eq!(pkg["notes"]["TODO"][0]["uid"], "bob");
    assert_eq!(pkg["notes"]["TODO"][0]["body"], "support ellipses.\n");
    let note = &pkg["notes"]["TODO"][0];
    assert!(note["pos"].as_u64().unwrap() < note["end"].as_u64().unwrap());
}

#[test]
fn test_types_with_values_factories_and_methods() {
    let temp_dir = fixture();
    let pkg = document(&Config::new(temp_dir.path()));
    let types = &pkg["types"];

    let unit = find(types, "Unit");
    assert_eq!(unit["type"], "type");
    assert_eq!(unit["consts"][0]["names"], serde_json::json!(["Meter", "Foot"]));
    assert_eq!(unit["consts"][0]["type"], "const");
    assert_eq!(unit["consts"][0]["doc"], "Supported units.\n");
    assert!(unit["filename"].as_str().unwrap().ends_with("shapes.go"));
    assert_eq!(unit["line"], 12);

    let circle = find(types, "Circle");
    let new_circle = find(&circle["funcs"], "NewCircle");
    assert_eq!(
        new_circle["parameters"],
        serde_json::json!([{"type": "float64", "name": "r"}, {"type": "...Unit", "name": "units"}])
    );
    assert_eq!(find(&circle["methods"], "Area")["recv"], "*Circle");
    assert_eq!(find(&circle["methods"], "String")["recv"], "Circle");

    assert!(pkg["types"].as_array().unwrap().iter().all(|t| t["name"] != "base"));
}

#[test]
fn test_promoted_methods() {
    let temp_dir = fixture();
    let pkg = document(&Config::new(temp_dir.path()));

    let labeled = find(&pkg["types"], "Labeled");
    let methods = labeled["methods"].as_array().unwrap();
    let names: Vec<&str> = methods.iter().map(|m| m["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Label"]);
    assert_eq!(methods[0]["recv"], "Labeled");
    assert_eq!(methods[0]["orig"], "*base");
}

#[test]
fn test_function_signatures() {
    let temp_dir = fixture();
    let pkg = document(&Config::new(temp_dir.path()));

    let sum = find(&pkg["funcs"], "Sum");
    assert_eq!(
        sum["parameters"],
        serde_json::json!([
            {"type": "[]Shape", "name": "shapes"},
            {"type": "map [string]float64", "name": "scale"},
            {"type": "func(int)error", "name": "f"}
        ])
    );
}

#[test]
fn test_vars_keep_blank_names() {
    let temp_dir = fixture();
    let pkg = document(&Config::new(temp_dir.path()));

    let vars = pkg["vars"].as_array().unwrap();
    assert_eq!(vars.len(), 1);
    assert_eq!(vars[0]["names"], serde_json::json!(["Epsilon", "_"]));
    assert_eq!(vars[0]["type"], "var");
}

#[test]
fn test_every_entry_carries_its_package() {
    let temp_dir = fixture();
    let config = Config::new(temp_dir.path());
    let import_path = config.import_path.clone();
    let packages = document_directory(&config).unwrap();
    let pkg = &packages[0];

    let mut owners: Vec<(&str, &str)> = Vec::new();
    owners.extend(pkg.consts.iter().map(|v| (v.package_name.as_str(), v.package_import_path.as_str())));
    owners.extend(pkg.vars.iter().map(|v| (v.package_name.as_str(), v.package_import_path.as_str())));
    owners.extend(pkg.funcs.iter().map(|f| (f.package_name.as_str(), f.package_import_path.as_str())));
    for t in &pkg.types {
        owners.push((t.package_name.as_str(), t.package_import_path.as_str()));
        owners.extend(t.consts.iter().map(|v| (v.package_name.as_str(), v.package_import_path.as_str())));
        owners.extend(t.funcs.iter().map(|f| (f.package_name.as_str(), f.package_import_path.as_str())));
        owners.extend(t.methods.iter().map(|f| (f.package_name.as_str(), f.package_import_path.as_str())));
    }

    assert!(!owners.is_empty());
    assert!(owners.iter().all(|&(name, path)| name == "shapes" && path == import_path));
}

#[test]
fn test_all_mode_documents_unexported() {
    let temp_dir = fixture();
    let pkg = document(&Config::new(temp_dir.path()).with_mode(ExtractMode::All));

    let base = find(&pkg["types"], "base");
    assert_eq!(find(&base["methods"], "Label")["recv"], "*base");
    assert_eq!(pkg["vars"][0]["names"], serde_json::json!(["Epsilon", "delta"]));
}
