use crate::dtos::{ProfileResponse, ProfileUpdateResponse};
use crate::handlers::multipart::read_form;
use crate::models::Profile;
use crate::services::metrics::names;
use crate::services::storage_key;
use crate::startup::AppState;
use axum::{
    extract::{Multipart, State},
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;

/// Returns the household profile, or the empty shape before one exists.
pub async fn get_profile(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let profile = state.profiles.get().await.map_err(|e| {
        tracing::error!("Failed to load household profile: {}", e);
        e
    })?;

    Ok(Json(profile.map(ProfileResponse::from).unwrap_or_default()))
}

pub async fn update_profile(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut form = read_form(&mut multipart, state.config.storage.max_upload_bytes).await?;
    let family_name = form.take_text("familyName").unwrap_or_default();
    let picture = form.take_file("profilePicture");

    let existing = state.profiles.get().await?;

    let new_key = match picture {
        Some(picture) => {
            let key = storage_key(&picture.file_name);
            state.storage.upload(&key, picture.data).await.map_err(|e| {
                tracing::error!("Failed to write profile picture {}: {}", key, e);
                e
            })?;
            Some(key)
        }
        None => None,
    };

    let (profile, displaced) = match existing {
        Some(mut profile) => {
            let displaced = profile.apply_update(family_name, new_key.clone());
            (profile, displaced)
        }
        None => (Profile::new(family_name, new_key.clone()), None),
    };

    if let Err(e) = state.profiles.save(&profile).await {
        tracing::error!("Failed to save household profile: {}", e);
        if let Some(key) = &new_key {
            if let Err(cleanup) = state.storage.delete(key).await {
                tracing::error!(storage_key = %key, "Orphaned file left in storage: {}", cleanup);
            }
        }
        return Err(e);
    }

    if let Some(old_key) = displaced {
        if let Err(e) = state.storage.delete(&old_key).await {
            tracing::warn!(storage_key = %old_key, "Failed to remove previous profile picture: {}", e);
        }
    }

    metrics::counter!(names::PROFILE_UPDATES).increment(1);
    tracing::info!(
        picture_replaced = new_key.is_some(),
        "Household profile updated"
    );

    Ok(Json(ProfileUpdateResponse {
        message: "Profile updated successfully".to_string(),
        profile: ProfileResponse::from(profile),
    }))
}
