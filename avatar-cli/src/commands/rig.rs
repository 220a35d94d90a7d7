//! Rig inspection commands

use anyhow::{Context, Result};
use avatar_rig::{JointRole, ModelHandle, derive_joints, load_model, role_for};
use clap::Subcommand;
use console::style;
use std::path::{Path, PathBuf};

use crate::utils::{add_table_row, create_table};

#[derive(Subcommand)]
pub enum RigCommands {
    /// List the node hierarchy of a model with the role each bone maps to
    Bones {
        /// Path to the glTF/GLB file
        file: PathBuf,

        /// Include nodes that are not skin joints
        #[arg(short, long)]
        all: bool,
    },

    /// Show which joint fills each gesture role
    Joints {
        /// Path to the glTF/GLB file
        file: PathBuf,
    },

    /// Classify bone names without loading a model
    Classify {
        /// Bone names to classify
        #[arg(required = true)]
        names: Vec<String>,
    },
}

pub fn execute(cmd: RigCommands) -> Result<()> {
    match cmd {
        RigCommands::Bones { file, all } => handle_bones(&file, all),
        RigCommands::Joints { file } => handle_joints(&file),
        RigCommands::Classify { names } => {
            handle_classify(&names);
            Ok(())
        }
    }
}

fn load(file: &Path) -> Result<ModelHandle> {
    load_model(file).with_context(|| format!("Failed to load model '{}'", file.display()))
}

fn handle_bones(file: &Path, all: bool) -> Result<()> {
    let model = load(file)?;

    println!("Model: {}", file.display());
    println!("Nodes: {}", model.nodes().len());
    println!("Joints: {}", model.joints().count());
    if !model.animations().is_empty() {
        println!("Animations: {}", model.animations().join(", "));
    }
    println!();

    let mut table = create_table(&["Index", "Name", "Joint", "Role"]);
    for node in model.traverse().filter(|node| all || node.is_joint) {
        let indent = "  ".repeat(model.depth(node.index));
        let role = role_for(&node.name).map_or_else(|| "-".to_string(), |r| r.to_string());
        add_table_row(
            &mut table,
            vec![
                node.index.to_string(),
                format!("{indent}{}", node.name),
                if node.is_joint { "yes" } else { "no" }.to_string(),
                role,
            ],
        );
    }
    table.printstd();

    Ok(())
}

fn handle_joints(file: &Path) -> Result<()> {
    let model = load(file)?;
    let joints = derive_joints(&model);

    for role in JointRole::ALL {
        let found = joints
            .get(role)
            .and_then(|joint| model.node(joint.index()));
        match found {
            Some(node) => println!(
                "{} found: {} ({})",
                role.label(),
                style(&node.name).green(),
                style(format!("#{}", node.index)).dim()
            ),
            None => println!("{} found: {}", role.label(), style("Not found").yellow()),
        }
    }

    if joints.is_empty() {
        println!();
        println!("No arm joints found; gestures will play without visible arm motion.");
    }

    Ok(())
}

fn handle_classify(names: &[String]) {
    let mut table = create_table(&["Name", "Role", "Vocabulary"]);
    for name in names {
        let (role, terms) = match role_for(name) {
            Some(role) => (role.to_string(), role.vocabulary().join(", ")),
            None => ("-".to_string(), String::new()),
        };
        add_table_row(&mut table, vec![name.clone(), role, terms]);
    }
    table.printstd();
}
