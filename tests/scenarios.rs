use joinlab::datasets::{customers, music_library, orders};
use joinlab::join::{compute_join, JoinResult, JoinType};
use joinlab::model::{DatabaseSchema, Table};
use joinlab::related::find_all_related_rows;
use joinlab::sql::{generate_create_table_sql, generate_join_sql, generate_schema_sql};
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;

fn set(ids: &[&str]) -> BTreeSet<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

fn shop_join(join_type: JoinType) -> JoinResult {
    compute_join(&customers(), &orders(), "customer_id", "customer_id", join_type)
}

#[test]
fn customer_order_row_counts() {
    let counts: Vec<(JoinType, usize)> = JoinType::ALL
        .iter()
        .map(|&jt| (jt, shop_join(jt).rows.len()))
        .collect();
    assert_eq!(
        counts,
        vec![
            (JoinType::Inner, 5),
            (JoinType::Left, 7),
            (JoinType::Right, 6),
            (JoinType::FullOuter, 8),
            (JoinType::Cross, 30),
        ]
    );
}

#[test]
fn customer_order_exclusions() {
    let inner = shop_join(JoinType::Inner);
    assert!(!inner.matched_left_ids.contains("cust-5"));
    assert!(!inner.matched_right_ids.contains("ord-106"));
    assert!(!inner.matched_left_ids.contains("cust-4"));

    let left = shop_join(JoinType::Left);
    let unmatched: Vec<&str> = left
        .rows
        .iter()
        .filter(|r| !r.is_matched)
        .filter_map(|r| r.left_row.as_ref().map(|l| l.id.as_str()))
        .collect();
    assert_eq!(unmatched, vec!["cust-4", "cust-5"]);
}

#[test]
fn customer_order_left_rows_follow_customer_order() {
    let left = shop_join(JoinType::Left);
    let pairs: Vec<(&str, Option<&str>)> = left
        .rows
        .iter()
        .map(|r| {
            (
                r.left_row.as_ref().map(|x| x.id.as_str()).unwrap_or("-"),
                r.right_row.as_ref().map(|x| x.id.as_str()),
            )
        })
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("cust-1", Some("ord-101")),
            ("cust-1", Some("ord-103")),
            ("cust-2", Some("ord-102")),
            ("cust-2", Some("ord-105")),
            ("cust-3", Some("ord-104")),
            ("cust-4", None),
            ("cust-5", None),
        ]
    );
}

/// Row-count identities and matched-id soundness on any pair of tables.
fn check_identities(l: &Table, r: &Table, lc: &str, rc: &str) {
    let lk = l.cell_key(lc);
    let rk = r.cell_key(rc);

    let mut k = 0;
    let mut left_hit = BTreeSet::new();
    let mut right_hit = BTreeSet::new();
    for lr in &l.rows {
        for rr in &r.rows {
            if lr.cell(lk).matches(rr.cell(rk)) {
                k += 1;
                left_hit.insert(lr.id.clone());
                right_hit.insert(rr.id.clone());
            }
        }
    }
    let left_miss = l.rows.len() - left_hit.len();
    let right_miss = r.rows.len() - right_hit.len();

    let expect = [
        (JoinType::Cross, l.rows.len() * r.rows.len()),
        (JoinType::Inner, k),
        (JoinType::Left, k + left_miss),
        (JoinType::Right, k + right_miss),
        (JoinType::FullOuter, k + left_miss + right_miss),
    ];

    for (jt, n) in expect {
        let res = compute_join(l, r, lc, rc, jt);
        assert_eq!(res.rows.len(), n, "{jt}");

        if jt == JoinType::Cross {
            let all_left: BTreeSet<String> = l.rows.iter().map(|x| x.id.clone()).collect();
            let all_right: BTreeSet<String> = r.rows.iter().map(|x| x.id.clone()).collect();
            assert_eq!(res.matched_left_ids, all_left);
            assert_eq!(res.matched_right_ids, all_right);
            continue;
        }

        let seen_left: BTreeSet<String> = res
            .rows
            .iter()
            .filter(|x| x.is_matched)
            .filter_map(|x| x.left_row.as_ref().map(|row| row.id.clone()))
            .collect();
        let seen_right: BTreeSet<String> = res
            .rows
            .iter()
            .filter(|x| x.is_matched)
            .filter_map(|x| x.right_row.as_ref().map(|row| row.id.clone()))
            .collect();
        assert_eq!(res.matched_left_ids, seen_left, "{jt}");
        assert_eq!(res.matched_right_ids, seen_right, "{jt}");
    }
}

#[test]
fn join_identities_hold_on_sample_tables() {
    check_identities(&customers(), &orders(), "customer_id", "customer_id");
    check_identities(&orders(), &customers(), "customer_id", "customer_id");

    let music = music_library();
    let artists = music.table("artists").unwrap();
    let albums = music.table("albums").unwrap();
    let songs = music.table("songs").unwrap();
    check_identities(artists, albums, "artist_id", "artist_id");
    check_identities(albums, songs, "album_id", "album_id");
    // deliberately mismatched keys
    check_identities(albums, songs, "release_year", "duration_seconds");
}

#[test]
fn joins_against_an_empty_table() {
    let empty = Table::new("empty", "Empty");
    let c = customers();

    assert!(compute_join(&c, &empty, "customer_id", "x", JoinType::Inner).rows.is_empty());
    assert!(compute_join(&c, &empty, "customer_id", "x", JoinType::Right).rows.is_empty());
    assert_eq!(compute_join(&c, &empty, "customer_id", "x", JoinType::Left).rows.len(), 5);
    assert_eq!(compute_join(&c, &empty, "customer_id", "x", JoinType::FullOuter).rows.len(), 5);

    // No pairs exist, so nothing is marked on either side.
    let cross = compute_join(&c, &empty, "customer_id", "x", JoinType::Cross);
    assert!(cross.rows.is_empty());
    assert!(cross.matched_left_ids.is_empty());
}

#[test]
fn artist_discovers_albums_and_songs() {
    let schema = music_library();
    let artists = schema.table("artists").unwrap();
    // Radiohead: OK Computer (2 songs) and Kid A (1 song)
    let radiohead = artists.find_row("artist-2").unwrap();
    let related = find_all_related_rows(radiohead, artists, &schema);
    assert_eq!(related.len(), 2);
    assert_eq!(related["albums"], set(&["album-2", "album-7"]));
    assert_eq!(related["songs"], set(&["song-3", "song-4", "song-13"]));

    // Taylor Swift: 1989 and Midnights, two songs each
    let taylor = artists.find_row("artist-1").unwrap();
    let related = find_all_related_rows(taylor, artists, &schema);
    assert_eq!(related["albums"], set(&["album-1", "album-6"]));
    assert_eq!(related["songs"], set(&["song-1", "song-2", "song-11", "song-12"]));
    assert!(!related.contains_key("artists"));
}

#[test]
fn song_discovers_album_artist_and_siblings() {
    let schema = music_library();
    let songs = schema.table("songs").unwrap();
    let song = songs.find_row("song-14").unwrap();
    let related = find_all_related_rows(song, songs, &schema);

    assert_eq!(related["albums"], set(&["album-4", "album-8"]));
    assert_eq!(related["artists"], set(&["artist-4"]));
    assert_eq!(related["songs"], set(&["song-7", "song-8", "song-15"]));
}

#[test]
fn traversal_is_direction_agnostic() {
    let schema = music_library();
    let albums = schema.table("albums").unwrap();
    let artists = schema.table("artists").unwrap();

    let album = albums.find_row("album-3").unwrap();
    let up = find_all_related_rows(album, albums, &schema);
    assert!(up["artists"].contains("artist-3"));

    let artist = artists.find_row("artist-3").unwrap();
    let down = find_all_related_rows(artist, artists, &schema);
    assert!(down["albums"].contains("album-3"));

    // Flipping the declaration changes nothing.
    let mut flipped = schema.clone();
    for rel in &mut flipped.relationships {
        std::mem::swap(&mut rel.source_table_id, &mut rel.target_table_id);
        std::mem::swap(&mut rel.source_column_id, &mut rel.target_column_id);
    }
    assert_eq!(find_all_related_rows(artist, artists, &flipped), down);
}

#[test]
fn traversal_without_relationships_is_empty() {
    let mut schema = music_library();
    schema.relationships.clear();
    let artists = schema.table("artists").unwrap();
    assert!(find_all_related_rows(&artists.rows[0], artists, &schema).is_empty());
}

#[test]
fn sql_generation_is_deterministic() {
    let (c, o) = (customers(), orders());
    for jt in JoinType::ALL {
        assert_eq!(
            generate_join_sql(&c, &o, "customer_id", "customer_id", jt),
            generate_join_sql(&c, &o, "customer_id", "customer_id", jt)
        );
    }
    assert_eq!(generate_create_table_sql(&o), generate_create_table_sql(&o));

    let schema = DatabaseSchema::from_tables(vec![c, o]);
    assert_eq!(generate_schema_sql(&schema), generate_schema_sql(&schema.clone()));
    assert!(generate_schema_sql(&schema).contains("FOREIGN KEY (customer_id) REFERENCES Customers(customer_id)"));
}

#[test]
fn join_result_carries_sql() {
    assert_eq!(
        shop_join(JoinType::Inner).sql,
        "SELECT *\nFROM Customers\nINNER JOIN Orders\n  ON Customers.customer_id = Orders.customer_id;"
    );
    assert_eq!(shop_join(JoinType::Cross).sql, "SELECT *\nFROM Customers\nCROSS JOIN Orders;");
}

#[test]
fn schema_json_round_trip_preserves_traversal() {
    let schema = music_library();
    let json = serde_json::to_string(&schema).unwrap();
    let back: DatabaseSchema = serde_json::from_str(&json).unwrap();
    let artists = back.table("artists").unwrap();
    let related = find_all_related_rows(&artists.rows[4], artists, &back);
    assert_eq!(related["albums"], set(&["album-5"]));
    assert_eq!(related["songs"], set(&["song-10", "song-9"]));
}
