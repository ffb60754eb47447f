// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Batch import of uploaded CityGML files.

use crate::types::{FileImport, ImportOptions};
use citygml_lite_geometry::{import_each, FileReport, MaterialPair};

/// An uploaded file waiting to be imported.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub data: Vec<u8>,
    /// Cache key for this file under the request options.
    pub cache_key: String,
}

/// Import uploaded files in parallel, keeping upload order.
///
/// Bytes are decoded per their XML declaration; content that cannot be
/// decoded or parsed fails that file only. CPU-bound: call from a blocking
/// task.
pub fn process_files(
    files: &[UploadedFile],
    options: &ImportOptions,
    materials: &MaterialPair,
) -> Vec<FileImport> {
    let settings = options.to_settings();
    let reports = import_each(
        files,
        |file| file.name.clone(),
        |file| FileReport::from_bytes(file.name.as_str(), &file.data, &settings, materials),
    );

    reports
        .iter()
        .zip(files)
        .map(|(report, file)| {
            let mut entry = FileImport::from(report);
            entry.cache_key = Some(file.cache_key.clone());
            entry
        })
        .collect()
}
