//! Test utilities for the backend crate.
//!
//! Shared by unit tests in `src/` and integration suites in `tests/` (through
//! the `test-support` feature).

pub mod cap_fs {
    //! Capability-safe filesystem helpers for tests.
    //!
    //! The backend reads and writes files through `cap_std::fs::Dir`; these
    //! helpers give test suites the same access without `std::fs`.

    use std::ffi::OsString;
    use std::io;
    use std::path::Path;

    use cap_std::{ambient_authority, fs::Dir};

    /// Read a file's bytes through `cap_std`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cocktails::test_support::cap_fs::{read_file, write_file};
    ///
    /// let path = std::env::temp_dir().join("cap-fs-read-example.json");
    /// write_file(&path, b"[]\n")?;
    /// assert_eq!(read_file(&path)?, b"[]\n");
    /// # Ok::<(), std::io::Error>(())
    /// ```
    pub fn read_file(path: &Path) -> io::Result<Vec<u8>> {
        let (parent, file_name) = parent_and_file_name(path)?;
        let directory = Dir::open_ambient_dir(parent, ambient_authority())?;
        directory.read(Path::new(&file_name))
    }

    /// Write bytes to a file through `cap_std`, creating parent directories.
    pub fn write_file(path: &Path, contents: &[u8]) -> io::Result<()> {
        let (parent, file_name) = parent_and_file_name(path)?;
        Dir::create_ambient_dir_all(parent, ambient_authority())?;
        let directory = Dir::open_ambient_dir(parent, ambient_authority())?;
        directory.write(Path::new(&file_name), contents)
    }

    /// Return true when `path` exists, false when it does not.
    pub fn path_exists(path: &Path) -> bool {
        let Ok((parent, file_name)) = parent_and_file_name(path) else {
            return false;
        };
        let Ok(directory) = Dir::open_ambient_dir(parent, ambient_authority()) else {
            return false;
        };
        directory.exists(Path::new(&file_name))
    }

    /// Sorted names of the entries in `path`; a missing directory is empty.
    pub fn list_file_names(path: &Path) -> io::Result<Vec<String>> {
        let directory = match Dir::open_ambient_dir(path, ambient_authority()) {
            Ok(directory) => directory,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => return Err(error),
        };
        let mut names = Vec::new();
        for entry in directory.entries()? {
            names.push(entry?.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    fn parent_and_file_name(path: &Path) -> io::Result<(&Path, OsString)> {
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let file_name = path.file_name().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "path must include a file or directory name",
            )
        })?;
        Ok((parent, file_name.to_os_string()))
    }
}

pub mod fixtures {
    //! Deterministic sample entities.
    //!
    //! Identifiers are fixed so snapshots written in one test can be compared
    //! byte for byte with those written in another.

    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use crate::domain::{BarItem, Cocktail, Ingredient, RemovedCocktail, Role, User, UserBar};

    /// Identifier of the admin fixture user.
    pub const ADA_ID: Uuid = Uuid::from_u128(0x0000_0001_0000_4000_8000_0000_0000_0001);
    /// Identifier of the creator fixture user.
    pub const GRACE_ID: Uuid = Uuid::from_u128(0x0000_0001_0000_4000_8000_0000_0000_0002);

    fn id(n: u128) -> Uuid {
        Uuid::from_u128(0x0000_0002_0000_4000_8000_0000_0000_0000 | n)
    }

    fn ingredient(
        n: u128,
        volume: f64,
        unit: &str,
        name: &str,
        tag: Option<&str>,
        order: i32,
    ) -> Ingredient {
        Ingredient {
            id: id(n),
            volume,
            unit: unit.to_owned(),
            name: name.to_owned(),
            tag: tag.map(str::to_owned),
            order_index: order,
        }
    }

    /// Two users: an admin and a creator.
    pub fn users() -> Vec<User> {
        vec![
            User {
                id: ADA_ID,
                username: "ada".to_owned(),
                password_hash: "$2b$12$adaadaadaadaadaadaadaO".to_owned(),
                role: Role::Admin,
            },
            User {
                id: GRACE_ID,
                username: "grace".to_owned(),
                password_hash: "$2b$12$gracegracegracegraceO".to_owned(),
                role: Role::Creator,
            },
        ]
    }

    /// One bar owned by [`ADA_ID`], with a removed cocktail copy.
    pub fn bars() -> Vec<UserBar> {
        vec![UserBar {
            id: id(0x100),
            user_id: ADA_ID,
            items: vec![
                BarItem {
                    name: "London dry gin".to_owned(),
                    category: "Spirits".to_owned(),
                },
                BarItem {
                    name: "Lemon".to_owned(),
                    category: "Fruit".to_owned(),
                },
            ],
            favourites: vec![id(0x200).to_string()],
            removed: vec![RemovedCocktail {
                id: "legacy-zombie".to_owned(),
                name: "Zombie".to_owned(),
                creator: "Donn Beach".to_owned(),
                removed_at: Utc
                    .with_ymd_and_hms(2024, 3, 14, 18, 30, 0)
                    .single()
                    .unwrap_or_default(),
            }],
        }]
    }

    /// Three cocktails, ingredients in order-index order. Two have no image.
    pub fn cocktails() -> Vec<Cocktail> {
        vec![
            Cocktail {
                id: id(0x200),
                name: "Sloe Gin Fizz".to_owned(),
                creator: "-".to_owned(),
                style: "Shaken".to_owned(),
                comment: "top with soda".to_owned(),
                category: "Fizz".to_owned(),
                image_url: Some("Images/sloe-gin-fizz.jpg".to_owned()),
                ingredients: vec![
                    ingredient(0x201, 60.0, "ml", "sloe gin", Some("gin"), 0),
                    ingredient(0x202, 20.0, "ml", "lemon juice", None, 1),
                    ingredient(0x203, 12.5, "ml", "sugar syrup", None, 2),
                ],
            },
            Cocktail {
                id: id(0x300),
                name: "Daiquiri".to_owned(),
                creator: "Jennings Cox".to_owned(),
                style: "Shaken".to_owned(),
                comment: String::new(),
                category: "Sour".to_owned(),
                image_url: None,
                ingredients: vec![
                    ingredient(0x301, 60.0, "ml", "white rum", Some("rum"), 0),
                    ingredient(0x302, 25.0, "ml", "lime juice", None, 1),
                ],
            },
            Cocktail {
                id: id(0x400),
                name: "Old Fashioned".to_owned(),
                creator: String::new(),
                style: "Stirred".to_owned(),
                comment: "orange twist".to_owned(),
                category: "Classic".to_owned(),
                image_url: None,
                ingredients: vec![
                    ingredient(0x402, 50.0, "ml", "bourbon", Some("whiskey"), 0),
                    ingredient(0x401, 2.0, "dash", "angostura bitters", None, 1),
                ],
            },
        ]
    }
}

mod clock {
    use chrono::{DateTime, Local, TimeZone, Utc};
    use mockable::Clock;

    /// Clock frozen at one instant.
    #[derive(Debug, Clone, Copy)]
    pub struct FixtureClock {
        utc_now: DateTime<Utc>,
    }

    impl FixtureClock {
        /// Freeze the clock at `utc_now`.
        pub fn new(utc_now: DateTime<Utc>) -> Self {
            Self { utc_now }
        }

        /// Freeze the clock at 2024-06-01T12:00:00Z.
        pub fn at_fixture_instant() -> Self {
            Self::new(
                Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0)
                    .single()
                    .unwrap_or_default(),
            )
        }
    }

    impl Clock for FixtureClock {
        fn local(&self) -> DateTime<Local> {
            self.utc_now.with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            self.utc_now
        }
    }
}

pub use clock::FixtureClock;

mod in_memory;

pub use in_memory::InMemoryState;
