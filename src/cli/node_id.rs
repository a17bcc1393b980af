//
//  gh-actions-client
//  cli/node_id.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Node id conversion commands
//!
//! ## Examples
//!
//! ```bash
//! gha node-id encode 583231 User          # MDQ6VXNlcjU4MzIzMQ==
//! gha node-id decode MDQ6VXNlcjU4MzIzMQ== # User 583231
//! gha node-id decode MDQ6VXNlcjU4MzIzMQ== --expect Issue   # fails
//! ```

use anyhow::Result;
use clap::{Args, Subcommand};
use serde_json::json;

use crate::api::common::{decode_node_id, decode_node_id_as, encode_node_id};

use super::GlobalOptions;

/// Encode and decode node ids
#[derive(Args, Debug)]
pub struct NodeIdCommand {
    #[command(subcommand)]
    pub command: NodeIdSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum NodeIdSubcommand {
    /// Build the node id of a database id
    Encode {
        /// Numeric database id
        id: u64,
        /// Resource type name (e.g., User, Repository, Issue)
        type_name: String,
    },

    /// Split a node id into type name and database id
    Decode {
        /// The node id
        node_id: String,
        /// Fail unless the node id has this type
        #[arg(long)]
        expect: Option<String>,
    },
}

impl NodeIdCommand {
    pub fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            NodeIdSubcommand::Encode { id, type_name } => {
                let node_id = encode_node_id(*id, type_name)?;
                if global.json {
                    println!("{}", json!({"node_id": node_id, "id": id, "type": type_name}));
                } else {
                    println!("{}", node_id);
                }
            }
            NodeIdSubcommand::Decode { node_id, expect } => {
                let (id, type_name) = match expect {
                    Some(expected) => (decode_node_id_as(node_id, expected)?, expected.clone()),
                    None => decode_node_id(node_id)?,
                };
                if global.json {
                    println!("{}", json!({"node_id": node_id, "id": id, "type": type_name}));
                } else {
                    println!("{} {}", type_name, id);
                }
            }
        }
        Ok(())
    }
}
