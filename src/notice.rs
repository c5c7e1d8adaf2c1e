use std::io::Write;
use std::path::{Component, Path, PathBuf};

use crate::cli::Args;
use crate::error::NoticeError;
use crate::manifest::{DependencyId, DependencyRecord, Manifest};

/// File name of the generated notice
pub const DOCUMENT_NAME: &str = "THIRD_PARTY_LICENSES.md";
/// Directory that receives the copied license files
pub const LICENSES_DIR_NAME: &str = "third-party-licenses";

/// Where the notice and the copied license files are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub document: PathBuf,
    pub licenses_dir: PathBuf,
}

impl OutputPaths {
    /// The default layout inside a directory, normally the working directory
    pub fn in_dir(root: &Path) -> Self {
        Self {
            document: root.join(DOCUMENT_NAME),
            licenses_dir: root.join(LICENSES_DIR_NAME),
        }
    }

    /// Markdown link target for a file, relative to the directory of the document
    pub fn link_to(&self, file: &Path) -> String {
        let relative = self
            .document
            .parent()
            .and_then(|dir| file.strip_prefix(dir).ok());

        match relative {
            Some(relative) => relative
                .components()
                .filter_map(|c| match c {
                    Component::Normal(x) => Some(x.to_string_lossy()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join("/"),
            None => file.display().to_string(),
        }
    }
}

/// A dependency as it appears in the notice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeEntry {
    pub name: String,
    pub version: Option<String>,
    pub licenses: Option<String>,
    pub repository: Option<String>,
    pub publisher: Option<String>,
    pub email: Option<String>,
    /// copied license file, relative to the document
    pub license_link: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|x| !x.is_empty()).cloned()
}

impl NoticeEntry {
    /// Combine a parsed record with the link to its copied license file
    pub fn new(id: DependencyId, record: &DependencyRecord, license_link: Option<String>) -> Self {
        Self {
            name: id.name,
            version: id.version,
            licenses: record.licenses.as_ref().and_then(|x| x.display()),
            repository: non_empty(&record.repository),
            publisher: non_empty(&record.publisher),
            email: non_empty(&record.email),
            license_link,
        }
    }

    /// Write the markdown section for this dependency
    pub fn write<W>(&self, mut w: W) -> std::io::Result<()>
    where
        W: Write,
    {
        writeln!(w, "### {}", self.name)?;
        writeln!(w)?;
        writeln!(w, "- Name: {}", self.name)?;
        if let Some(version) = &self.version {
            writeln!(w, "- Version: {version}")?;
        }
        if let Some(licenses) = &self.licenses {
            writeln!(w, "- License: {licenses}")?;
        }
        if let Some(url) = &self.repository {
            writeln!(w, "- Repository: [{url}]({url})")?;
        }
        if let Some(publisher) = &self.publisher {
            writeln!(w, "- Publisher: {publisher}")?;
        }
        if let Some(email) = &self.email {
            writeln!(w, "- Email: [{email}](mailto:{email})")?;
        }
        if let Some(link) = &self.license_link {
            writeln!(w, "- License File: [{link}]({link})")?;
        }
        writeln!(w)?;
        Ok(())
    }
}

/// Name of the copied license file: path separators and `@` become `_`, the extension is kept
pub fn license_file_name(name: &str, source: &Path) -> String {
    let mut file_name: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | '@' => '_',
            c => c,
        })
        .collect();
    if let Some(ext) = source.extension() {
        file_name.push('.');
        file_name.push_str(&ext.to_string_lossy());
    }
    file_name
}

/// Copy the license file of a dependency into the license directory.
///
/// Returns the link to the copy, or `None` if there was nothing to copy or the copy failed.
fn collect_license_file(name: &str, source: Option<&Path>, paths: &OutputPaths) -> Option<String> {
    let source = match source {
        Some(x) if x.exists() => x,
        _ => {
            eprintln!("No license file found for dependency: {name}");
            return None;
        }
    };

    let dest = paths.licenses_dir.join(license_file_name(name, source));
    match std::fs::copy(source, &dest) {
        Ok(_) => {
            println!("Copied: {} -> {}", source.display(), dest.display());
            Some(paths.link_to(&dest))
        }
        Err(err) => {
            eprintln!("Failed to copy: {} ({err})", source.display());
            None
        }
    }
}

/// Write the complete markdown listing, header first
pub fn write_report<W>(mut w: W, entries: &[NoticeEntry]) -> std::io::Result<()>
where
    W: Write,
{
    writeln!(w, "# THIRD-PARTY SOFTWARE LICENSES")?;
    writeln!(w)?;
    writeln!(
        w,
        "This project includes third-party software components, which are distributed under the"
    )?;
    writeln!(
        w,
        "following licenses. Full licenses and notices are provided in the"
    )?;
    writeln!(
        w,
        "[{LICENSES_DIR_NAME}/]({LICENSES_DIR_NAME}) subdirectory."
    )?;
    writeln!(w)?;
    writeln!(w, "## Node Dependencies")?;
    writeln!(w)?;

    for entry in entries {
        entry.write(&mut w)?;
    }

    Ok(())
}

/// Copy license files and render the notice, without writing the document itself
pub fn build_notice(
    manifest: &Manifest,
    include: Option<&Path>,
    paths: &OutputPaths,
) -> Result<Vec<u8>, NoticeError> {
    std::fs::create_dir_all(&paths.licenses_dir).map_err(|source| NoticeError::Write {
        path: paths.licenses_dir.clone(),
        source,
    })?;

    let entries: Vec<NoticeEntry> = manifest
        .entries
        .iter()
        .map(|(key, record)| {
            let id = DependencyId::parse(key);
            // the install path is not carried into the entry
            let link = collect_license_file(&id.name, record.license_file.as_deref(), paths);
            NoticeEntry::new(id, record, link)
        })
        .collect();

    let mut report = Vec::new();
    write_report(&mut report, &entries).map_err(|source| NoticeError::Write {
        path: paths.document.clone(),
        source,
    })?;

    if let Some(include) = include {
        let content = std::fs::read(include).map_err(|source| NoticeError::IncludeRead {
            path: include.to_path_buf(),
            source,
        })?;
        report.extend_from_slice(&content);
        println!("Included: {}", include.display());
    }

    Ok(report.trim_ascii().to_vec())
}

/// Generate the notice document and license directory from validated arguments
pub fn gen_notice(args: &Args, paths: &OutputPaths) -> Result<(), NoticeError> {
    let manifest = Manifest::load(&args.manifest)?;

    let report = build_notice(&manifest, args.include.as_deref(), paths)?;

    std::fs::write(&paths.document, report).map_err(|source| NoticeError::Write {
        path: paths.document.clone(),
        source,
    })?;
    println!("Wrote license file {}", paths.document.display());

    Ok(())
}
