// Smoldot
// Copyright (C) 2019-2022  Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later WITH Classpath-exception-2.0

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Directory opening code.

use super::{parse_file_name, FileProvider};
use crate::certifiers::{index::SeedIndex, StorageError};

use std::{fs, path::Path};

/// Opens the directory described by the given [`Config`].
///
/// The directory is created if it doesn't exist yet. Files whose name isn't the name of a seed
/// are ignored.
pub fn open(config: Config) -> Result<FileProvider, StorageError> {
    fs::create_dir_all(config.path)?;

    let mut index = SeedIndex::new();
    for entry in fs::read_dir(config.path)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }

        let file_name = entry.file_name();
        let Some((height, hash)) = file_name.to_str().and_then(parse_file_name) else {
            continue;
        };

        let _ = index.insert(height, &hash, ());
    }

    Ok(FileProvider {
        directory: config.path.to_owned(),
        index,
    })
}

/// Configuration for opening a [`FileProvider`].
#[derive(Debug)]
pub struct Config<'a> {
    /// Path to the directory containing the seeds.
    pub path: &'a Path,
}
