// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Import endpoint for CityGML files.

use crate::error::ApiError;
use crate::services::{process_files, DiskCache, UploadedFile};
use crate::types::{FileImport, ImportOptions, ImportResponse, ImportStats, MaterialData};
use crate::AppState;
use axum::{
    extract::{Multipart, State},
    Json,
};
use std::time::Instant;

/// Files and options collected from a multipart request.
struct ImportRequest {
    files: Vec<(String, Vec<u8>)>,
    options: ImportOptions,
}

/// Read every multipart field.
///
/// `file` fields are uploads; other text fields are import options and may
/// come before or after the files.
async fn extract_request(
    multipart: &mut Multipart,
    max_file_size: usize,
    max_file_size_mb: usize,
    max_files: usize,
) -> Result<ImportRequest, ApiError> {
    let mut files = Vec::new();
    let mut options = ImportOptions::default();

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();
        tracing::debug!(field_name = %field_name, "Processing multipart field");

        if field_name == "file" {
            if files.len() == max_files {
                return Err(ApiError::TooManyFiles { max: max_files });
            }
            let name = field
                .file_name()
                .map(|n| n.to_string())
                .unwrap_or_else(|| format!("upload_{}.gml", files.len() + 1));
            let bytes = field.bytes().await?;
            if bytes.len() > max_file_size {
                return Err(ApiError::FileTooLarge {
                    max_mb: max_file_size_mb,
                });
            }
            tracing::debug!(file = %name, size = bytes.len(), "Extracted file from multipart");
            files.push((name, bytes.to_vec()));
        } else {
            let value = field.text().await?;
            if !options.apply_field(&field_name, &value)? {
                tracing::debug!(field_name = %field_name, "Ignoring unknown field");
            }
        }
    }

    if files.is_empty() {
        tracing::warn!("No 'file' field found in multipart request");
        return Err(ApiError::MissingFile);
    }

    Ok(ImportRequest { files, options })
}

/// POST /api/v1/import - Import one or more CityGML files.
///
/// Every file is imported on its own; a failing file is reported in its
/// entry and the others proceed.
pub async fn import_files(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ImportResponse>, ApiError> {
    let start = Instant::now();
    let ImportRequest { files, options } = extract_request(
        &mut multipart,
        state.config.max_file_size_bytes(),
        state.config.max_file_size_mb,
        state.config.max_files_per_request,
    )
    .await?;

    // Serve what we can from cache, collect the rest
    let mut results: Vec<Option<FileImport>> = Vec::with_capacity(files.len());
    let mut pending: Vec<(usize, UploadedFile)> = Vec::new();
    for (index, (name, data)) in files.into_iter().enumerate() {
        let cache_key = DiskCache::generate_key(&data, &options);
        match state.cache.get::<FileImport>(&cache_key).await? {
            Some(mut cached) if cached.name == name => {
                tracing::info!(file = %name, cache_key = %cache_key, "Cache HIT");
                cached.from_cache = true;
                results.push(Some(cached));
            }
            _ => {
                tracing::info!(file = %name, cache_key = %cache_key, size = data.len(), "Cache MISS - processing");
                results.push(None);
                pending.push((index, UploadedFile { name, data, cache_key }));
            }
        }
    }

    if !pending.is_empty() {
        let (indices, uploads): (Vec<usize>, Vec<UploadedFile>) = pending.into_iter().unzip();
        let materials = state.materials.clone();

        // CPU-intensive: run on the blocking pool
        let processed =
            tokio::task::spawn_blocking(move || process_files(&uploads, &options, &materials)).await?;

        for (index, entry) in indices.into_iter().zip(processed) {
            if entry.is_imported() {
                if let Some(key) = entry.cache_key.clone() {
                    let cache = state.cache.clone();
                    let to_cache = entry.clone();
                    tokio::spawn(async move {
                        if let Err(e) = cache.set(&key, &to_cache).await {
                            tracing::error!(error = %e, "Failed to cache result");
                        }
                    });
                }
            }
            results[index] = Some(entry);
        }
    }

    let files: Vec<FileImport> = results.into_iter().flatten().collect();
    let stats = ImportStats::from_files(&files, start.elapsed().as_millis() as u64);
    tracing::info!(
        files = stats.total_files,
        imported = stats.imported_files,
        failed = stats.failed_files,
        cached = stats.cached_files,
        total_ms = stats.total_time_ms,
        "Import request finished"
    );

    Ok(Json(ImportResponse {
        files,
        materials: state.materials.slots().into_iter().map(MaterialData::from).collect(),
        options,
        stats,
    }))
}
