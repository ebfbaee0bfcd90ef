use super::JournalError;
use crate::db::{Journal, KeyValueStore};
use crate::models::{Profile, ProfileUpdate};

pub async fn get_profile<S: KeyValueStore>(journal: &Journal<S>) -> Result<Profile, JournalError> {
  Ok(journal.profile().await?)
}

/// Apply the provided fields and persist; untouched fields keep their values
pub async fn update_profile<S: KeyValueStore>(
  journal: &Journal<S>,
  update: ProfileUpdate,
) -> Result<Profile, JournalError> {
  let mut profile = journal.profile().await?;
  if update.is_empty() {
    return Ok(profile);
  }

  update.apply(&mut profile);
  journal.set_profile(&profile).await?;

  tracing::info!(
    goal_category = profile.goal_category.as_str(),
    support_style = profile.support_style.as_str(),
    "Profile updated"
  );
  Ok(profile)
}
