//! Twitter payload normalization.

use twitter::{MediaEntity, Tweet};

use super::Normalizer;
use crate::error::NormalizeError;
use crate::types::{Connection, ItemKind, NewStreamItem, Provider, RawPost, StreamConnection};

pub(super) fn normalize_tweet(
    normalizer: &Normalizer,
    tweet: &Tweet,
    stream_connection: &StreamConnection,
    connection: &Connection,
    raw: &RawPost,
) -> Result<NewStreamItem, NormalizeError> {
    let date = normalizer.resolve_timestamp(&tweet.created_at)?;
    let mut item = NewStreamItem::new(
        stream_connection.stream_id,
        stream_connection.connection_id,
        Provider::Twitter,
        ItemKind::Status,
        date,
        tweet.id_str.clone(),
    );

    let mut body = expand_urls(tweet);

    // A tweet with exactly one embedded photo becomes a photo item; the
    // photo's own t.co substring is dropped from the text.
    let photos: Vec<&MediaEntity> = tweet
        .entities
        .media
        .iter()
        .filter(|m| m.media_type == "photo")
        .collect();
    if let [photo] = photos.as_slice() {
        item.kind = ItemKind::Photo;
        item.picture = Some(photo.media_url_https.clone());
        item.picture_id = Some(photo.id_str.clone());
        body = body.replace(&photo.url, "").trim_end().to_string();
    }

    item.title = tweet.id_str.clone();
    item.body = body;
    item.permalink = format!(
        "https://twitter.com/{}/status/{}",
        connection.username, tweet.id_str
    );
    item.raw_data = serde_json::to_value(raw)?;
    Ok(item)
}

/// Replace every shortened URL in the text with its expanded form.
fn expand_urls(tweet: &Tweet) -> String {
    let mut text = tweet.text.clone();
    for entity in &tweet.entities.urls {
        text = text.replace(&entity.url, &entity.expanded_url);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    fn normalize(tweet: Tweet) -> NewStreamItem {
        let connection = testing::twitter_connection();
        let sc = testing::stream_connection(&connection);
        let raw = RawPost::Tweet(tweet);
        let RawPost::Tweet(ref t) = raw else {
            unreachable!()
        };
        normalize_tweet(&Normalizer::utc(), t, &sc, &connection, &raw).unwrap()
    }

    #[test]
    fn shortened_urls_are_expanded() {
        let mut tweet = testing::tweet("1", "reading https://t.co/abc and https://t.co/xyz");
        tweet.entities.urls = vec![
            testing::url_entity("https://t.co/abc", "https://example.com/article"),
            testing::url_entity("https://t.co/xyz", "https://example.org/essay"),
        ];

        let item = normalize(tweet);
        assert_eq!(
            item.body,
            "reading https://example.com/article and https://example.org/essay"
        );
    }

    #[test]
    fn single_photo_tweet_becomes_a_photo_item() {
        let mut tweet = testing::tweet("2", "sunset https://t.co/pic");
        tweet.entities.media = vec![testing::photo_entity(
            "900",
            "https://t.co/pic",
            "https://pbs.twimg.com/media/sunset.jpg",
        )];

        let item = normalize(tweet);
        assert_eq!(item.kind, ItemKind::Photo);
        assert_eq!(
            item.picture.as_deref(),
            Some("https://pbs.twimg.com/media/sunset.jpg")
        );
        assert_eq!(item.picture_id.as_deref(), Some("900"));
        assert_eq!(item.body, "sunset");
        assert!(!item.body.contains("https://t.co/pic"));
    }

    #[test]
    fn multi_photo_tweet_stays_a_status() {
        let mut tweet = testing::tweet("3", "album https://t.co/a https://t.co/b");
        tweet.entities.media = vec![
            testing::photo_entity("901", "https://t.co/a", "https://pbs.twimg.com/media/a.jpg"),
            testing::photo_entity("902", "https://t.co/b", "https://pbs.twimg.com/media/b.jpg"),
        ];

        let item = normalize(tweet);
        assert_eq!(item.kind, ItemKind::Status);
        assert!(item.picture.is_none());
    }

    #[test]
    fn permalink_uses_username_and_native_id() {
        let item = normalize(testing::tweet("42", "hello"));
        assert_eq!(item.permalink, "https://twitter.com/testuser/status/42");
        assert_eq!(item.source_id, "42");
    }

    #[test]
    fn raw_payload_is_preserved() {
        let item = normalize(testing::tweet("7", "hello"));
        assert!(item.raw_data.get("Tweet").is_some());
    }
}
