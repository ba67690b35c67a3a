use crate::table::Table;
use log::*;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Files with these names sit alongside the data but aren't tables; they're
/// never parsed, wherever they turn up.
pub const SIDECAR_FILES: [&str; 2] = ["annotations.txt", "MANIFEST.txt"];

pub fn is_sidecar(path: &Path) -> bool {
    path.file_name()
        .and_then(|x| x.to_str())
        .map_or(false, |name| SIDECAR_FILES.contains(&name))
}

/// Reads every file under `root` (recursively) as a tab-separated table and
/// stacks them into one.
///
/// Files are visited in file-name order within each directory.  A single
/// unreadable file fails the whole load.
pub fn load(root: &Path) -> Result<Table, Error> {
    let mut table = Table::new();
    let mut n_files = 0;
    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| walk_error(root, e))?;
        if !entry.file_type().is_file() {
            continue;
        }
        if is_sidecar(entry.path()) {
            debug!("Skipping {}", entry.path().display());
            continue;
        }
        let n_rows = load_file(entry.path(), &mut table)?;
        debug!("Read {} rows from {}", n_rows, entry.path().display());
        n_files += 1;
    }
    if n_files == 0 {
        return Err(Error::NoDataFound {
            root: root.to_path_buf(),
        });
    }
    info!(
        "Loaded {} rows x {} columns from {} files",
        table.len(),
        table.columns.len(),
        n_files
    );
    Ok(table)
}

/// A root which isn't there is just a directory with no data in it.
fn walk_error(root: &Path, e: walkdir::Error) -> Error {
    let missing_root = e.depth() == 0
        && e.io_error().map(|e| e.kind()) == Some(std::io::ErrorKind::NotFound);
    if missing_root {
        Error::NoDataFound {
            root: root.to_path_buf(),
        }
    } else {
        Error::Walk(e)
    }
}

/// Appends the rows of one file to `table`, returning how many there were.
fn load_file(path: &Path, table: &mut Table) -> Result<usize, Error> {
    let parse_err = |source| Error::Parse {
        path: path.to_path_buf(),
        source,
    };
    // Short rows are padded with missing cells; long ones are an error
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .from_path(path)
        .map_err(parse_err)?;
    let headers = rdr.headers().map_err(parse_err)?.clone();
    if headers.is_empty() {
        return Err(Error::EmptyFile {
            path: path.to_path_buf(),
        });
    }
    let mut seen = HashSet::new();
    if let Some(dup) = headers.iter().find(|x| !seen.insert(*x)) {
        return Err(Error::DuplicateColumn {
            path: path.to_path_buf(),
            column: dup.to_string(),
        });
    }
    let positions = table.merge_columns(headers.iter());
    let mut n = 0;
    for row in rdr.records() {
        let row = row.map_err(parse_err)?;
        if row.len() > headers.len() {
            return Err(Error::TooManyFields {
                path: path.to_path_buf(),
                line: row.position().map_or(0, |pos| pos.line()),
                expected: headers.len(),
                found: row.len(),
            });
        }
        table.push(&positions, row.iter());
        n += 1;
    }
    Ok(n)
}

#[derive(Debug)]
pub enum Error {
    NoDataFound { root: PathBuf },
    EmptyFile { path: PathBuf },
    DuplicateColumn { path: PathBuf, column: String },
    TooManyFields {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },
    Parse { path: PathBuf, source: csv::Error },
    Walk(walkdir::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::NoDataFound { root } => write!(
                f,
                "Could not find any matching files under {}, wrong directory?",
                root.display()
            ),
            Error::EmptyFile { path } => write!(f, "{}: no columns to parse", path.display()),
            Error::DuplicateColumn { path, column } => {
                write!(f, "{}: column \"{}\" appears twice", path.display(), column)
            }
            Error::TooManyFields {
                path,
                line,
                expected,
                found,
            } => write!(
                f,
                "{}:{}: expected at most {} fields, saw {}",
                path.display(),
                line,
                expected,
                found
            ),
            Error::Parse { path, .. } => write!(f, "{}: not a tab-separated table", path.display()),
            Error::Walk(_) => f.write_str("Couldn't walk the input directory"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse { source, .. } => Some(source),
            Error::Walk(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn row_count_is_the_sum_of_files() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "one/a.txt", "id\tx\nA\t1\nB\t2\n");
        write(dir.path(), "two/b.txt", "id\tx\nC\t3\n");
        write(dir.path(), "two/deeper/c.txt", "id\tx\nA\t4\nA\t5\nD\t6\n");
        let table = load(dir.path()).unwrap();
        assert_eq!(table.len(), 6);
        assert_eq!(table.columns, vec!["id", "x"]);
    }

    #[test]
    fn discovery_order() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "b.tsv", "id\nsecond\n");
        write(dir.path(), "a.tsv", "id\nfirst\n");
        let table = load(dir.path()).unwrap();
        let ids = table.cells(0).collect::<Vec<_>>();
        assert_eq!(ids, vec![Some("first"), Some("second")]);
    }

    #[test]
    fn sidecars_are_skipped_everywhere() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "MANIFEST.txt", "id\tmd5\tsize\nnot\ta\trow\n");
        write(dir.path(), "case/annotations.txt", "\u{0}garbage\t\"unterminated\n");
        write(dir.path(), "case/sub/MANIFEST.txt", "x\n1\n2\n3\n");
        write(dir.path(), "case/data.txt", "id\tx\nA\t1\n");
        let table = load(dir.path()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.columns, vec!["id", "x"]);
    }

    #[test]
    fn sidecar_names_must_match_exactly() {
        assert!(is_sidecar(Path::new("a/b/annotations.txt")));
        assert!(is_sidecar(Path::new("MANIFEST.txt")));
        assert!(!is_sidecar(Path::new("manifest.txt")));
        assert!(!is_sidecar(Path::new("annotations.txt.bak")));
    }

    #[test]
    fn no_data_found() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("empty/nested")).unwrap();
        write(dir.path(), "only/annotations.txt", "whatever\n");
        match load(dir.path()) {
            Err(Error::NoDataFound { root }) => assert_eq!(root, dir.path()),
            x => panic!("expected NoDataFound, got {:?}", x),
        }
    }

    #[test]
    fn ragged_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "good.txt", "id\tx\nA\t1\n");
        write(dir.path(), "ragged.txt", "id\tx\nA\t1\textra\n");
        match load(dir.path()) {
            Err(Error::TooManyFields {
                path,
                line,
                expected,
                found,
            }) => {
                assert!(path.ends_with("ragged.txt"));
                assert_eq!((line, expected, found), (2, 2, 3));
            }
            x => panic!("expected too many fields, got {:?}", x),
        }
    }

    #[test]
    fn short_rows_are_padded() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "short.txt", "id\tx\ty\nA\t1\t2\nB\t3\nC\n");
        let table = load(dir.path()).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(
            table.cells(1).collect::<Vec<_>>(),
            vec![Some("1"), Some("3"), None]
        );
        assert_eq!(table.cells(2).collect::<Vec<_>>(), vec![Some("2"), None, None]);
    }

    #[test]
    fn missing_root_is_no_data() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("miRNA Files");
        match load(&root) {
            Err(Error::NoDataFound { root: x }) => assert_eq!(x, root),
            x => panic!("expected NoDataFound, got {:?}", x),
        }
    }

    #[test]
    fn invalid_utf8_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("binary.txt"), b"id\tx\n\xff\xfe\t1\n").unwrap();
        assert!(matches!(load(dir.path()), Err(Error::Parse { .. })));
    }

    #[test]
    fn empty_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "empty.txt", "");
        assert!(matches!(load(dir.path()), Err(Error::EmptyFile { .. })));
    }

    #[test]
    fn duplicate_column_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "dup.txt", "id\tx\tx\nA\t1\t2\n");
        match load(dir.path()) {
            Err(Error::DuplicateColumn { column, .. }) => assert_eq!(column, "x"),
            x => panic!("expected a duplicate column, got {:?}", x),
        }
    }

    #[test]
    fn header_only_file_counts_as_data() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "header.txt", "id\tx\n");
        let table = load(dir.path()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.columns, vec!["id", "x"]);
    }

    #[test]
    fn differing_columns_are_unioned() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.txt", "id\tx\nA\t1\n");
        write(dir.path(), "b.txt", "extra\tid\nq\tB\n");
        let table = load(dir.path()).unwrap();
        assert_eq!(table.columns, vec!["id", "x", "extra"]);
        assert_eq!(table.cells(1).collect::<Vec<_>>(), vec![Some("1"), None]);
        assert_eq!(table.cells(2).collect::<Vec<_>>(), vec![None, Some("q")]);
    }
}
