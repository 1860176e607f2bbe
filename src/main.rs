use std::collections::{BTreeMap, BTreeSet};
use std::env;
use std::error::Error;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use trianglem_reader::{DialogueUnit, ScriptArchive};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <game-dir> [output-dir]", args[0]);
        eprintln!();
        eprintln!("Example:");
        eprintln!(
            "  {} \"C:\\Program Files (x86)\\triangle\\Tlicolity Eyes Vol.2\"",
            args[0]
        );
        std::process::exit(1);
    }

    let game_dir = PathBuf::from(&args[1]);
    let output_dir = args
        .get(2)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("extracted_output"));

    match run(&game_dir, &output_dir) {
        Ok(0) => {
            eprintln!(
                "No fsroot directories with script archives found in {}",
                game_dir.display()
            );
            std::process::exit(1);
        }
        Ok(_) => {
            println!(
                "\n=== Extraction complete! Check {} ===",
                output_dir.display()
            );
        }
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    }
}

/// Process every fsroot volume under the game directory.
///
/// Returns the number of volumes extracted. One volume failing must not
/// stop the rest of the batch.
fn run(game_dir: &Path, output_dir: &Path) -> Result<usize, Box<dyn Error>> {
    fs::create_dir_all(output_dir)?;

    let mut fsroots: Vec<PathBuf> = fs::read_dir(game_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_dir()
                && path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with("fsroot"))
        })
        .collect();
    fsroots.sort();

    let mut extracted = 0;
    for fsroot in &fsroots {
        println!("\n=== Processing {} ===", fsroot.display());
        match extract_volume(fsroot, output_dir) {
            Ok(true) => extracted += 1,
            Ok(false) => {}
            Err(e) => eprintln!("  ERROR in {}: {}", fsroot.display(), e),
        }
    }
    Ok(extracted)
}

/// Extract one fsroot volume. Returns false when it carries no script
/// archive pair.
fn extract_volume(fsroot: &Path, output_dir: &Path) -> Result<bool, Box<dyn Error>> {
    let script_dir = fsroot.join("common");
    let memfs_path = script_dir.join("script.memfs");
    let membody_path = script_dir.join("script.membody");

    if !memfs_path.is_file() || !membody_path.is_file() {
        println!(
            "  No script.memfs/script.membody in {}",
            script_dir.display()
        );
        return Ok(false);
    }
    println!("  Found: script.memfs + script.membody");

    let volume = fsroot
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("fsroot")
        .to_string();

    let archive = ScriptArchive::open(&memfs_path, &membody_path)?;

    if archive.blob().size_mismatch {
        println!(
            "  NOTE: declared decompressed size ({}) differs from actual ({}); using actual bytes",
            archive.blob().declared_size,
            archive.blob().data.len()
        );
    }

    let units: Vec<DialogueUnit> = archive.dialogue_units().collect();

    let files_json = output_dir.join(format!("{}_files.json", volume));
    write_json(&files_json, &archive.catalog())?;
    println!("  Saved file list to: {}", files_json.display());

    let dialogue_json = output_dir.join(format!("{}_dialogue.json", volume));
    write_json(&dialogue_json, &units)?;
    println!("  Saved dialogue to: {}", dialogue_json.display());

    let template_path = output_dir.join(format!("{}_translation_template.txt", volume));
    write_template(&template_path, &units)?;
    println!(
        "  Saved translation template to: {}",
        template_path.display()
    );

    print_summary(&archive, &units);
    Ok(true)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), Box<dyn Error>> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, value)?;
    Ok(())
}

/// Write the human-readable translation template: one numbered block per
/// dialogue unit with a slot for the translated text.
fn write_template(path: &Path, units: &[DialogueUnit]) -> Result<(), Box<dyn Error>> {
    let mut out = BufWriter::new(File::create(path)?);
    for (i, unit) in units.iter().enumerate() {
        writeln!(out, "=== Entry {} ===", i + 1)?;
        writeln!(out, "File: {}", unit.source_file)?;
        writeln!(out, "Line: {}", unit.line_number)?;
        writeln!(out, "Scene: {}", unit.scene)?;
        if let Some(speaker) = &unit.speaker {
            writeln!(out, "Speaker: {}", speaker)?;
        }
        writeln!(out, "Context:\n{}", unit.context)?;
        writeln!(out, "\nOriginal Text:\n{}", unit.text)?;
        writeln!(out, "\nTranslation:\n[ENTER TRANSLATION HERE]")?;
        writeln!(out, "\n{}\n", "-".repeat(60))?;
    }
    Ok(())
}

fn print_summary(archive: &ScriptArchive, units: &[DialogueUnit]) {
    let with_speaker = units.iter().filter(|u| u.speaker.is_some()).count();
    let speakers: BTreeSet<&str> = units.iter().filter_map(|u| u.speaker.as_deref()).collect();

    let mut per_scene: BTreeMap<&str, usize> = BTreeMap::new();
    for unit in units {
        *per_scene.entry(unit.scene.as_str()).or_insert(0) += 1;
    }

    println!("\n  === Extraction Summary ===");
    println!("  Memfs index entries: {}", archive.catalog().len());
    println!("  Scenes in this volume: {}", archive.scenes().len());
    println!("  Total dialogue entries: {}", units.len());
    println!("  - With speaker names: {}", with_speaker);
    println!("  - Narrative text: {}", units.len() - with_speaker);
    println!("  Unique speakers: {}", speakers.len());

    println!("\n  Scenes found:");
    for scene in archive.scenes() {
        let count = per_scene.get(scene.name.as_str()).copied().unwrap_or(0);
        println!("    {}: {} dialogue lines", scene.name, count);
    }
}
