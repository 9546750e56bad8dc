use std::io;
use std::path::Path;

use console::Term;

/// Ask the user to confirm deleting `database_path`.
fn confirm(term: &Term, database_path: &Path) -> io::Result<bool> {
    term.write_str(&format!(
        "Delete {} and all synced stars? [y/N] ",
        database_path.display()
    ))?;
    let answer = term.read_line()?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

pub(crate) fn handle_purge(
    database_path: &Path,
    yes: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !yes {
        let term = Term::stderr();
        if !term.is_term() {
            return Err("Refusing to purge without confirmation; pass --yes".into());
        }
        if !confirm(&term, database_path)? {
            println!("Purge aborted.");
            return Ok(());
        }
    }

    if stars_keeper::purge(database_path)? {
        println!("Deleted {}", database_path.display());
    } else {
        println!("Nothing to purge at {}", database_path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y"));
        assert!(is_yes(" YES \n"));
        assert!(!is_yes(""));
        assert!(!is_yes("n"));
        assert!(!is_yes("yeah"));
    }

    #[test]
    fn test_purge_with_yes_removes_database() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("main.db");
        std::fs::write(&path, b"db").expect("write db");

        handle_purge(&path, true).expect("purge should succeed");

        assert!(!path.exists());
    }

    #[test]
    fn test_purge_missing_database_succeeds() {
        let dir = tempfile::tempdir().expect("tempdir");
        handle_purge(&dir.path().join("main.db"), true).expect("purge should succeed");
    }
}
