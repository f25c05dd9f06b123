use std::collections::BTreeMap;

use indexmap::IndexMap;
use lcov_sourcemap::types::{CoverageReport, SourceMaps};
use lcov_sourcemap::{Bias, OriginalPosition, PositionResolver, SourceMapResolver, transform};
use pretty_assertions::assert_eq;

/// Resolver driven by a line table: generated line -> (source, original line),
/// where `None` marks a mapping without a source.
struct TableResolver {
    root: String,
    lines: BTreeMap<u32, Option<(String, u32)>>,
}

impl TableResolver {
    fn new(root: &str, entries: &[(u32, Option<(&str, u32)>)]) -> Self {
        Self {
            root: root.to_string(),
            lines: entries
                .iter()
                .map(|(line, target)| (*line, target.map(|(s, l)| (s.to_string(), l))))
                .collect(),
        }
    }
}

impl PositionResolver for TableResolver {
    fn source_root(&self) -> &str {
        &self.root
    }

    fn original_position_for(
        &self,
        line: u32,
        _column: u32,
        bias: Bias,
    ) -> Option<OriginalPosition> {
        assert_eq!(bias, Bias::LeastUpperBound);
        let (_, target) = self.lines.range(line..).next()?;
        let (source, line) = target.clone()?;
        Some(OriginalPosition { source, line })
    }
}

fn parse_reports(lcov: &str) -> IndexMap<String, CoverageReport> {
    lcov_sourcemap::core::loader::key_reports(
        lcov_sourcemap::core::lcov::parse(lcov).expect("valid lcov"),
    )
}

fn render(files: &lcov_sourcemap::FileSet) -> String {
    files
        .values()
        .map(|f| f.to_lcov())
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_exact_mapping_moves_entries_to_original_lines() {
    let reports = parse_reports("SF:dist/app.js\nFN:10,start\nFNDA:3,start\nDA:10,3\nDA:11,0\nend_of_record");
    let maps = SourceMaps::Single(TableResolver::new(
        "/repo/",
        &[(10, Some(("/repo/src/app.ts", 2))), (11, Some(("/repo/src/app.ts", 4)))],
    ));

    let files = transform(&reports, &maps).unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(
        render(&files),
        "SF:./src/app.ts\nFN:2,start\nFNDA:3,start\nFNF:1\nFNH:1\nBRF:0\nBRH:0\nDA:2,3\nDA:4,0\nLF:2\nLH:1\nend_of_record"
    );
}

#[test]
fn test_least_upper_bound_and_unmapped_entries() {
    let reports = parse_reports(
        "SF:dist/app.js\nDA:1,1\nDA:5,2\nDA:6,4\nDA:20,9\nBRDA:6,0,0,1\nend_of_record",
    );
    // line 1 falls forward to line 3; line 5 forward to a source-less mapping;
    // line 20 has nothing after it
    let maps = SourceMaps::Single(TableResolver::new(
        "",
        &[(3, Some(("src/a.ts", 1))), (6, None), (8, Some(("src/a.ts", 7)))],
    ));

    let files = transform(&reports, &maps).unwrap();
    let file = &files["./src/a.ts"];
    assert_eq!(file.lines().collect::<Vec<_>>(), vec![(1, 1)]);
    assert!(!render(&files).contains("BRDA"));
}

#[test]
fn test_many_to_one_collapse_keeps_one_entry() {
    let reports = parse_reports("SF:dist/app.js\nFN:1,a\nFN:2,b\nDA:1,4\nDA:2,6\nend_of_record");
    let maps = SourceMaps::Single(TableResolver::new(
        "",
        &[(1, Some(("x.ts", 9))), (2, Some(("x.ts", 9)))],
    ));

    let files = transform(&reports, &maps).unwrap();
    let file = &files["./x.ts"];
    assert_eq!(file.lines().collect::<Vec<_>>(), vec![(9, 6)]);
    let functions: Vec<_> = file.functions().map(|(l, f)| (l, f.name.clone())).collect();
    assert_eq!(functions, vec![(9, "b".to_string())]);
}

#[test]
fn test_modules_sharing_an_original_file_feed_one_record() {
    let reports = parse_reports(
        "SF:dist/main.js\nDA:1,1\nDA:2,2\nend_of_record\n\
         SF:dist/worker.js\nDA:1,3\nend_of_record\n\
         SF:dist/runtime.js\nDA:1,8\nend_of_record\n",
    );
    let mut maps = BTreeMap::new();
    maps.insert(
        "main".to_string(),
        TableResolver::new(
            "/a/",
            &[(1, Some(("/a/src/main.ts", 1))), (2, Some(("/a/src/shared.ts", 5)))],
        ),
    );
    maps.insert(
        "worker".to_string(),
        TableResolver::new("/b", &[(1, Some(("/b/src/shared.ts", 12)))]),
    );
    let maps = SourceMaps::Keyed(maps);

    let files = transform(&reports, &maps).unwrap();
    let paths: Vec<&String> = files.keys().collect();
    assert_eq!(paths, vec!["./src/main.ts", "./src/shared.ts"]);
    assert_eq!(
        files["./src/shared.ts"].lines().collect::<Vec<_>>(),
        vec![(5, 2), (12, 3)]
    );
}

#[test]
fn test_module_without_map_contributes_nothing() {
    let reports = parse_reports("SF:dist/runtime.js\nDA:1,8\nend_of_record");
    let maps: SourceMaps<TableResolver> = SourceMaps::Keyed(BTreeMap::new());

    let files = transform(&reports, &maps).unwrap();
    assert!(files.is_empty());
}

#[test]
fn test_real_source_map_resolution() {
    // generated line 1 -> lib/a.js:3, line 3 -> lib/a.js:3, line 4 -> lib/a.js:5,
    // line 5 is a source-less segment
    let map = r#"{
        "version": 3,
        "file": "bundle.js",
        "sourceRoot": "/project",
        "sources": ["lib/a.js"],
        "names": [],
        "mappings": "AAEA;;AAAA;AAEA;A"
    }"#;
    let resolver = SourceMapResolver::from_slice(map.as_bytes()).unwrap();
    let reports = parse_reports(
        "SF:/build/dist/bundle.js
FN:1,main
FN:5,helper
FNDA:2,main
FNDA:9,helper
DA:1,2
DA:2,5
DA:4,1
DA:5,3
DA:9,1
BRDA:4,0,0,1
BRDA:4,0,1,-
BRDA:5,1,0,4
end_of_record",
    );

    let files = transform(&reports, &SourceMaps::Single(resolver)).unwrap();
    assert_eq!(
        render(&files),
        "SF:./lib/a.js
FN:3,main
FNDA:2,main
FNF:1
FNH:1
BRDA:5,0,0,1
BRDA:5,0,1,-
BRF:2
BRH:1
DA:3,5
DA:5,1
LF:2
LH:2
end_of_record"
    );
}

#[test]
fn test_sources_outside_source_root_keep_their_path() {
    let map = r#"{
        "version": 3,
        "sourceRoot": "/build",
        "sources": ["/elsewhere/a.js", "lib/b.js"],
        "names": [],
        "mappings": "AAAA;ACCA"
    }"#;
    let resolver = SourceMapResolver::from_slice(map.as_bytes()).unwrap();
    let reports = parse_reports("SF:dist/out.js\nDA:1,4\nDA:2,1\nend_of_record");

    let files = transform(&reports, &SourceMaps::Single(resolver)).unwrap();
    let paths: Vec<&String> = files.keys().collect();
    assert_eq!(paths, vec!["/elsewhere/a.js", "./lib/b.js"]);
    assert_eq!(files["/elsewhere/a.js"].lines().collect::<Vec<_>>(), vec![(1, 4)]);
}

#[test]
fn test_single_map_applies_to_every_module() {
    let reports = parse_reports(
        "SF:dist/main.js\nDA:1,1\nDA:2,2\nend_of_record\n\
         SF:dist/worker.js\nDA:3,5\nend_of_record\n",
    );
    let maps = SourceMaps::Single(TableResolver::new(
        "",
        &[
            (1, Some(("src/main.ts", 1))),
            (2, Some(("src/shared.ts", 4))),
            (3, Some(("src/shared.ts", 9))),
        ],
    ));

    let files = transform(&reports, &maps).unwrap();
    assert_eq!(
        render(&files),
        "SF:./src/main.ts
FNF:0
FNH:0
BRF:0
BRH:0
DA:1,1
LF:1
LH:1
end_of_record
SF:./src/shared.ts
FNF:0
FNH:0
BRF:0
BRH:0
DA:4,2
DA:9,5
LF:2
LH:2
end_of_record"
    );
}
