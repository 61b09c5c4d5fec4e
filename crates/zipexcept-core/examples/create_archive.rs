//! Example: archiving a project tree with zipexcept-core
//!
//! Run with: `cargo run --example create_archive`

use std::fs;
use zipexcept_core::ArchiveCreator;
use zipexcept_core::ArchiveFormat;
use zipexcept_core::CreationConfig;
use zipexcept_core::create_archive;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let workspace = tempfile::tempdir()?;
    let project = workspace.path().join("project");
    fs::create_dir_all(project.join("src"))?;
    fs::create_dir_all(project.join("target/debug"))?;
    fs::write(project.join("src/main.rs"), "fn main() {}\n")?;
    fs::write(project.join("build.log"), "compiling...\n")?;
    fs::write(project.join("target/debug/app"), "binary")?;

    let ignore_file = workspace.path().join(".tarignore");
    fs::write(&ignore_file, "# build output\n*.log\ntarget/\n")?;

    // Format detected from the output extension
    println!("Example 1: tar.gz with an ignore file");
    let config = CreationConfig::default().with_ignore_file(Some(ignore_file));
    let report = create_archive(
        workspace.path().join("project.tar.gz"),
        &[&project],
        &config,
    )?;
    println!("  Added {} files", report.files_added);
    println!("  Pruned {} directories", report.directories_pruned);
    println!("  Excluded {} files", report.files_excluded);
    for name in &report.entries {
        println!("    {name}");
    }

    println!("\nExample 2: builder with inline patterns");
    let report = ArchiveCreator::new()
        .output(workspace.path().join("project.zip"))
        .add_source(&project)
        .no_ignore_file()
        .exclude("target/")
        .format(ArchiveFormat::Zip)
        .compression_level(9)
        .create()?;
    println!("  Created {}", report.output.display());
    println!(
        "  {} files, {:.1}% space saved",
        report.files_added,
        report.compression_percentage()
    );

    Ok(())
}
