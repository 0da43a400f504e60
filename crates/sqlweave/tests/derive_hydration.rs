//! Derived models folded out of join-shaped row sets.

use sqlweave::RowSet;
use sqlweave::hydrate::{Cardinality, FieldKind};
use sqlweave::prelude::*;

#[derive(Debug, Default, PartialEq, Model)]
#[sqlweave(table = "artists")]
struct Artist {
    #[sqlweave(primary_key)]
    artist_id: i64,
    name: String,
    albums: Vec<Album>,
}

#[derive(Debug, Default, PartialEq, Model)]
struct Album {
    #[sqlweave(primary_key)]
    album_id: i64,
    title: Option<String>,
    #[sqlweave(column = "genre")]
    genres: Vec<String>,
}

#[derive(Debug, Default, PartialEq, Model)]
struct Employee {
    #[sqlweave(primary_key)]
    employee_id: i64,
    name: String,
    #[sqlweave(alias = "manager")]
    manager: Option<Box<Employee>>,
}

#[derive(Debug, Default, PartialEq, Model)]
struct Playlist {
    #[sqlweave(primary_key)]
    playlist_id: i64,
    #[sqlweave(primary_key = "name")]
    songs: Vec<Song>,
    #[sqlweave(skip)]
    cached_len: usize,
}

#[derive(Debug, Default, PartialEq, Model)]
struct Song {
    name: String,
    seconds: i32,
}

fn text(s: &str) -> Value {
    Value::from(s)
}

fn discography() -> RowSet {
    let mut rows = RowSet::with_column_names([
        "artists.artist_id",
        "artists.name",
        "album.album_id",
        "album.title",
        "album.genre",
    ]);
    rows.push(vec![Value::Int(1), text("AC/DC"), Value::Int(10), text("Back in Black"), text("rock")]);
    rows.push(vec![Value::Int(1), text("AC/DC"), Value::Int(10), text("Back in Black"), text("hard rock")]);
    rows.push(vec![Value::Int(1), text("AC/DC"), Value::Int(11), text("Highway to Hell"), text("rock")]);
    rows.push(vec![Value::Int(2), text("Adele"), Value::Null, Value::Null, Value::Null]);
    rows
}

#[test]
fn derived_descriptor_describes_fields() {
    let desc = Artist::descriptor();
    assert_eq!(desc.type_name, "artist");
    assert_eq!(desc.prefix(), "artists");
    assert_eq!(desc.fields.len(), 3);
    assert!(desc.fields[0].is_primary_key());

    match desc.fields[2].kind {
        FieldKind::Nested {
            model, cardinality, ..
        } => {
            assert_eq!(cardinality, Cardinality::Many);
            assert_eq!(model().type_name, "album");
        }
        FieldKind::Scalar { .. } => panic!("albums should be nested"),
    }

    let album = Album::descriptor();
    assert_eq!(album.fields[2].column, Some("genre"));
    assert!(matches!(
        album.fields[2].kind,
        FieldKind::Scalar { collect: true, .. }
    ));

    // skipped fields are not described
    assert_eq!(Playlist::descriptor().fields.len(), 2);
}

#[test]
fn join_rows_fold_into_nested_records() {
    let artists: Vec<Artist> = hydrate_all(&discography()).unwrap();

    assert_eq!(
        artists,
        vec![
            Artist {
                artist_id: 1,
                name: "AC/DC".into(),
                albums: vec![
                    Album {
                        album_id: 10,
                        title: Some("Back in Black".into()),
                        genres: vec!["rock".into(), "hard rock".into()],
                    },
                    Album {
                        album_id: 11,
                        title: Some("Highway to Hell".into()),
                        genres: vec!["rock".into()],
                    },
                ],
            },
            Artist {
                artist_id: 2,
                name: "Adele".into(),
                albums: vec![],
            },
        ]
    );
}

#[test]
fn hydrate_one_keeps_complete_collections() {
    let artist: Artist = hydrate_one(&discography()).unwrap().unwrap();
    assert_eq!(artist.artist_id, 1);
    assert_eq!(artist.albums.len(), 2);
}

#[test]
fn aliased_self_reference_stops_after_one_level() {
    let mut rows = RowSet::with_column_names([
        "employee.employee_id",
        "employee.name",
        "manager.employee_id",
        "manager.name",
    ]);
    rows.push(vec![Value::Int(1), text("Ann"), Value::Null, Value::Null]);
    rows.push(vec![Value::Int(2), text("Bob"), Value::Int(1), text("Ann")]);

    let staff: Vec<Employee> = hydrate_all(&rows).unwrap();
    assert_eq!(staff.len(), 2);
    assert_eq!(staff[0].manager, None);
    assert_eq!(
        staff[1].manager,
        Some(Box::new(Employee {
            employee_id: 1,
            name: "Ann".into(),
            manager: None,
        }))
    );
}

#[derive(Debug, Default, PartialEq, Model)]
struct Pair {
    #[sqlweave(primary_key)]
    a: String,
    #[sqlweave(primary_key)]
    b: Option<String>,
    note: String,
}

#[test]
fn composite_text_keys_never_collide() {
    let mut rows = RowSet::with_column_names(["pair.a", "pair.b", "pair.note"]);
    let keys: [(&str, Option<&str>); 4] = [
        ("x,y", Some("z")),
        ("x", Some("y,z")),
        ("n", Some("NULL")),
        ("n", None),
    ];
    for (i, (a, b)) in keys.into_iter().enumerate() {
        rows.push(vec![Value::from(a), Value::from(b), Value::from(format!("row {i}"))]);
    }

    let pairs: Vec<Pair> = hydrate_all(&rows).unwrap();
    let notes: Vec<&str> = pairs.iter().map(|p| p.note.as_str()).collect();
    assert_eq!(notes, ["row 0", "row 1", "row 2", "row 3"]);
    assert_eq!(pairs[2].b.as_deref(), Some("NULL"));
    assert_eq!(pairs[3].b, None);
}

#[test]
fn nested_key_override_merges_by_name() {
    let mut rows = RowSet::with_column_names(["playlist.playlist_id", "song.name", "song.seconds"]);
    rows.push(vec![Value::Int(1), text("intro"), Value::Int(100)]);
    rows.push(vec![Value::Int(1), text("intro"), Value::Int(100)]);
    rows.push(vec![Value::Int(1), text("outro"), Value::Int(50)]);

    let lists: Vec<Playlist> = hydrate_all(&rows).unwrap();
    assert_eq!(lists.len(), 1);
    let names: Vec<&str> = lists[0].songs.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["intro", "outro"]);
    assert_eq!(lists[0].cached_len, 0);
}

#[test]
fn model_values_feed_insert_and_update() {
    let artists = Table::new("music", "artists");
    let artist_id = artists.column::<Integer>("artist_id");
    let name = artists.column::<Text>("name");

    let acdc = Artist {
        artist_id: 1,
        name: "AC/DC".into(),
        albums: vec![Album::default()],
    };
    let adele = Artist {
        artist_id: 2,
        name: "Adele".into(),
        albums: vec![],
    };

    let insert = artists.insert((&artist_id, &name)).models([&acdc, &adele]);
    let built = insert.build(Dialect::postgres()).unwrap();
    assert_eq!(
        built.sql,
        "\nINSERT INTO music.artists (artist_id, name)\nVALUES ($1, $2),\n       ($3, $4);\n"
    );
    assert_eq!(
        built.args,
        vec![Value::Int(1), text("AC/DC"), Value::Int(2), text("Adele")]
    );

    let update = artists
        .update()
        .set_model(&name, &adele)
        .where_(artist_id.eq(2));
    let built = update.build(Dialect::mysql()).unwrap();
    assert_eq!(built.args, vec![text("Adele"), Value::Int(2)]);
    assert!(built.sql.contains("SET name = ?"), "{}", built.sql);
}
