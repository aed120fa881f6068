// std
use std::{env, fs, path::PathBuf, process, sync::Arc};
// crates.io
use time::OffsetDateTime;
// self
use greencare_client::{
	auth::{TokenPair, TokenSecret},
	store::{FileTokenStore, MemoryTokenStore, TokenStore},
};

fn temp_path(label: &str) -> PathBuf {
	let unique = format!(
		"greencare_client_{label}_{}_{}.json",
		process::id(),
		OffsetDateTime::now_utc().unix_timestamp_nanos(),
	);

	env::temp_dir().join(unique)
}

async fn read_pair(store: &dyn TokenStore) -> Option<(String, String)> {
	let access = store.access().await.expect("Reading the access token should succeed.")?;
	let refresh = store.refresh().await.expect("Reading the refresh token should succeed.")?;

	Some((access.expose().into(), refresh.expose().into()))
}

#[tokio::test]
async fn memory_store_round_trips_through_the_trait_object() {
	let store: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::default());

	assert_eq!(read_pair(store.as_ref()).await, None);

	store
		.set_tokens(TokenSecret::new("access-1"), TokenSecret::new("refresh-1"))
		.await
		.expect("Storing the pair should succeed.");

	assert_eq!(
		read_pair(store.as_ref()).await,
		Some(("access-1".into(), "refresh-1".into()))
	);

	store.clear().await.expect("Clearing the store should succeed.");

	assert_eq!(read_pair(store.as_ref()).await, None);
}

#[tokio::test]
async fn memory_store_clones_share_one_session() {
	let original = MemoryTokenStore::with_tokens(TokenPair::new("access-a", "refresh-a"));
	let clone = original.clone();

	clone
		.set_tokens(TokenSecret::new("access-b"), TokenSecret::new("refresh-b"))
		.await
		.expect("Storing through the clone should succeed.");

	// Clones are one logical store, so the original observes the rotation.
	let snapshot = original.snapshot().expect("The session should still exist.");

	assert_eq!(snapshot.access.expose(), "access-b");

	clone.clear().await.expect("Clearing through the clone should succeed.");

	assert_eq!(original.snapshot(), None);
}

#[tokio::test]
async fn file_store_persists_across_a_reopen() {
	let path = temp_path("trait_reopen");

	{
		let store: Arc<dyn TokenStore> = Arc::new(
			FileTokenStore::open(&path).expect("Opening the file store should succeed."),
		);

		store
			.set_tokens(TokenSecret::new("access-disk"), TokenSecret::new("refresh-disk"))
			.await
			.expect("Persisting the pair should succeed.");
	}

	let reopened: Arc<dyn TokenStore> = Arc::new(
		FileTokenStore::open(&path).expect("Reopening the file store should succeed."),
	);

	assert_eq!(
		read_pair(reopened.as_ref()).await,
		Some(("access-disk".into(), "refresh-disk".into()))
	);

	fs::remove_file(&path).unwrap_or_else(|e| {
		panic!("Failed to remove temporary store snapshot {}: {e}", path.display())
	});
}
