//! Facebook payload normalization.

use facebook::{ImageVariant, Photo, Place, StatusUpdate};

use super::Normalizer;
use crate::error::NormalizeError;
use crate::types::{Connection, ItemKind, NewStreamItem, Provider, RawPost, StreamConnection};

/// Exact widths the feed exposes as the smaller renditions.
const MEDIUM_WIDTH: u32 = 480;
const SMALL_WIDTH: u32 = 320;

pub(super) fn normalize_status(
    normalizer: &Normalizer,
    status: &StatusUpdate,
    stream_connection: &StreamConnection,
    connection: &Connection,
    raw: &RawPost,
) -> Result<NewStreamItem, NormalizeError> {
    let date = normalizer.resolve_timestamp(&status.updated_time)?;
    let mut item = NewStreamItem::new(
        stream_connection.stream_id,
        stream_connection.connection_id,
        Provider::Facebook,
        ItemKind::Status,
        date,
        status.id.clone(),
    );

    let author = status
        .from
        .as_ref()
        .map(|f| f.name.as_str())
        .unwrap_or(&connection.username);
    item.title = format!("{} posted a status update.", author);
    item.body = status.message.clone().unwrap_or_default();
    item.permalink = permalink(&connection.external_account_id, &status.id);
    copy_location(&mut item, status.place.as_ref());
    item.raw_data = serde_json::to_value(raw)?;
    Ok(item)
}

pub(super) fn normalize_photo(
    normalizer: &Normalizer,
    photo: &Photo,
    stream_connection: &StreamConnection,
    connection: &Connection,
    raw: &RawPost,
) -> Result<NewStreamItem, NormalizeError> {
    let date = normalizer.resolve_timestamp(&photo.created_time)?;
    let mut item = NewStreamItem::new(
        stream_connection.stream_id,
        stream_connection.connection_id,
        Provider::Facebook,
        ItemKind::Photo,
        date,
        photo.id.clone(),
    );

    let author = photo
        .from
        .as_ref()
        .map(|f| f.name.as_str())
        .unwrap_or(&connection.username);
    item.title = format!("{} posted a photo.", author);
    item.body = photo.name.clone().unwrap_or_default();

    item.picture = largest_variant(&photo.images).map(|v| v.source.clone());
    item.picture_medium = variant_with_width(&photo.images, MEDIUM_WIDTH);
    item.picture_small = variant_with_width(&photo.images, SMALL_WIDTH);
    item.picture_id = Some(photo.id.clone());

    item.permalink = photo
        .link
        .clone()
        .unwrap_or_else(|| permalink(&connection.external_account_id, &photo.id));
    copy_location(&mut item, photo.place.as_ref());
    item.raw_data = serde_json::to_value(raw)?;
    Ok(item)
}

/// Graph ids are composite ("{page}_{post}"); the permalink wants the
/// post segment alone.
fn permalink(account_id: &str, post_id: &str) -> String {
    let post_part = post_id.split('_').nth(1).unwrap_or(post_id);
    format!("https://facebook.com/{}/posts/{}", account_id, post_part)
}

fn largest_variant(images: &[ImageVariant]) -> Option<&ImageVariant> {
    images.iter().max_by_key(|v| v.width)
}

/// Exact width match only; a missing rendition stays `None` rather than
/// falling back to the nearest size.
fn variant_with_width(images: &[ImageVariant], width: u32) -> Option<String> {
    images
        .iter()
        .find(|v| v.width == width)
        .map(|v| v.source.clone())
}

fn copy_location(item: &mut NewStreamItem, place: Option<&Place>) {
    let Some(place) = place else { return };
    item.place_id = place.id.clone();
    item.place_name = place.name.clone();
    if let Some(location) = &place.location {
        item.street = location.street.clone();
        item.city = location.city.clone();
        item.state = location.state.clone();
        item.country = location.country.clone();
        item.latitude = location.latitude;
        item.longitude = location.longitude;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    fn normalize_photo_fixture(photo: Photo) -> NewStreamItem {
        let connection = testing::facebook_connection();
        let sc = testing::stream_connection(&connection);
        let raw = RawPost::FacebookPhoto(photo);
        let RawPost::FacebookPhoto(ref p) = raw else {
            unreachable!()
        };
        normalize_photo(&Normalizer::utc(), p, &sc, &connection, &raw).unwrap()
    }

    fn normalize_status_fixture(status: StatusUpdate) -> NewStreamItem {
        let connection = testing::facebook_connection();
        let sc = testing::stream_connection(&connection);
        let raw = RawPost::FacebookStatus(status);
        let RawPost::FacebookStatus(ref s) = raw else {
            unreachable!()
        };
        normalize_status(&Normalizer::utc(), s, &sc, &connection, &raw).unwrap()
    }

    #[test]
    fn picture_variants_resolve_by_width() {
        let photo = testing::fb_photo_with_widths("10_77", &[120, 320, 480, 720]);
        let item = normalize_photo_fixture(photo);

        assert_eq!(item.picture.as_deref(), Some("https://cdn.test/w720.jpg"));
        assert_eq!(
            item.picture_medium.as_deref(),
            Some("https://cdn.test/w480.jpg")
        );
        assert_eq!(
            item.picture_small.as_deref(),
            Some("https://cdn.test/w320.jpg")
        );
    }

    #[test]
    fn missing_exact_widths_stay_empty() {
        let photo = testing::fb_photo_with_widths("10_78", &[120, 700]);
        let item = normalize_photo_fixture(photo);

        assert_eq!(item.picture.as_deref(), Some("https://cdn.test/w700.jpg"));
        assert!(item.picture_medium.is_none());
        assert!(item.picture_small.is_none());
    }

    #[test]
    fn status_title_and_permalink_are_synthesized() {
        let status = testing::fb_status("10_99", Some("hello world"));
        let item = normalize_status_fixture(status);

        assert_eq!(item.title, "Test Page posted a status update.");
        assert_eq!(item.body, "hello world");
        assert_eq!(item.permalink, "https://facebook.com/10/posts/99");
        assert_eq!(item.kind, ItemKind::Status);
    }

    #[test]
    fn non_composite_ids_keep_the_full_id() {
        assert_eq!(permalink("10", "99"), "https://facebook.com/10/posts/99");
    }

    #[test]
    fn partial_location_data_is_valid() {
        let mut status = testing::fb_status("10_100", Some("checked in"));
        status.place = Some(Place {
            id: Some("place-1".into()),
            name: Some("The Depot".into()),
            location: Some(facebook::Location {
                city: Some("Minneapolis".into()),
                country: Some("United States".into()),
                ..Default::default()
            }),
        });

        let item = normalize_status_fixture(status);
        assert_eq!(item.place_name.as_deref(), Some("The Depot"));
        assert_eq!(item.city.as_deref(), Some("Minneapolis"));
        assert!(item.street.is_none());
        assert!(item.latitude.is_none());
    }
}
