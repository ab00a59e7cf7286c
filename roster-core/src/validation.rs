use chrono::{DateTime, Utc};

use roster_database::model::filter::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use roster_database::model::{NewPlayer, PageRequest, PlayerChanges, PlayerPatch, PlayerRecord};
use roster_utils::leveling::{MAX_EXPERIENCE, derive_progress};
use roster_utils::time::{BIRTHDAY_YEARS, from_epoch_millis, year_within};

use crate::Error;

pub const NAME_MAX_CHARS: usize = 12;
pub const TITLE_MAX_CHARS: usize = 30;

pub fn check_name(name: &str) -> Result<(), Error> {
    let length = name.chars().count();
    if length == 0 || length > NAME_MAX_CHARS {
        return Err(Error::bad_request("The player name is too long or absent"));
    }
    Ok(())
}

pub fn check_title(title: &str) -> Result<(), Error> {
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(Error::bad_request("The title is too long or absent"));
    }
    Ok(())
}

pub fn check_experience(experience: i32) -> Result<(), Error> {
    if !(0..=MAX_EXPERIENCE).contains(&experience) {
        return Err(Error::bad_request("The player experience is out of range"));
    }
    Ok(())
}

/// Convert a birthday in epoch milliseconds, enforcing the allowed years.
pub fn check_birthday(millis: i64) -> Result<DateTime<Utc>, Error> {
    from_epoch_millis(millis)
        .filter(|birthday| year_within(birthday, &BIRTHDAY_YEARS))
        .ok_or_else(|| Error::bad_request("The player birthday is out of range"))
}

/// Convert an `after`/`before` listing bound given in epoch milliseconds.
pub fn birthday_bound(millis: i64, param: &str) -> Result<DateTime<Utc>, Error> {
    from_epoch_millis(millis)
        .ok_or_else(|| Error::bad_request(format!("`{param}` is not a valid timestamp")))
}

/// Check a creation payload and derive the level fields.
pub fn validate_new_player(payload: NewPlayer) -> Result<PlayerRecord, Error> {
    let NewPlayer {
        name: Some(name),
        title: Some(title),
        race: Some(race),
        profession: Some(profession),
        birthday: Some(birthday),
        experience: Some(experience),
        banned,
    } = payload
    else {
        return Err(Error::bad_request("Please fill in all required fields"));
    };

    check_name(&name)?;
    check_title(&title)?;
    check_experience(experience)?;
    let birthday = check_birthday(birthday)?;
    let (level, until_next_level) = derive_progress(experience);

    Ok(PlayerRecord {
        name,
        title,
        race,
        profession,
        birthday,
        experience,
        level,
        until_next_level,
        banned: banned.unwrap_or(false),
    })
}

/// Check the fields present in a partial update. Derived fields are only
/// produced when experience is part of the patch.
pub fn validate_patch(patch: PlayerPatch) -> Result<PlayerChanges, Error> {
    let name = patch.name.into_option();
    let title = patch.title.into_option();
    let experience = patch.experience.into_option();

    if let Some(name) = &name {
        check_name(name)?;
    }
    if let Some(title) = &title {
        check_title(title)?;
    }
    if let Some(experience) = experience {
        check_experience(experience)?;
    }
    let birthday = patch.birthday.into_option().map(check_birthday).transpose()?;
    let progress = experience.map(derive_progress);

    Ok(PlayerChanges {
        name,
        title,
        race: patch.race.into_option(),
        profession: patch.profession.into_option(),
        birthday,
        experience,
        level: progress.map(|(level, _)| level),
        until_next_level: progress.map(|(_, remaining)| remaining),
        banned: patch.banned.into_option(),
    })
}

/// Build a page request, applying the listing defaults.
pub fn page_request(number: Option<i64>, size: Option<i64>) -> Result<PageRequest, Error> {
    let number = number.unwrap_or(0);
    let size = size.unwrap_or(i64::from(DEFAULT_PAGE_SIZE));

    let number = u32::try_from(number)
        .map_err(|_| Error::bad_request("pageNumber must be zero or greater"))?;
    let size = u32::try_from(size)
        .ok()
        .filter(|size| (1..=MAX_PAGE_SIZE).contains(size))
        .ok_or_else(|| {
            Error::bad_request(format!("pageSize must be between 1 and {MAX_PAGE_SIZE}"))
        })?;

    Ok(PageRequest { number, size })
}

#[cfg(test)]
mod tests {
    use roster_database::model::{Field, NewPlayer, PageRequest, PlayerPatch, Profession, Race};

    use super::{page_request, validate_new_player, validate_patch};
    use crate::Error;

    // 2010-01-01T00:00:00Z
    const BIRTHDAY_2010: i64 = 1_262_304_000_000;
    // 1999-12-31T23:59:59Z
    const BIRTHDAY_1999: i64 = 946_684_799_000;
    // 3000-12-31T23:59:59Z
    const BIRTHDAY_3000: i64 = 32_535_215_999_000;
    // 3001-01-01T00:00:00Z
    const BIRTHDAY_3001: i64 = 32_535_216_000_000;

    fn payload() -> NewPlayer {
        NewPlayer {
            name: Some("Arwen".to_owned()),
            title: Some("Evenstar".to_owned()),
            race: Some(Race::Elf),
            profession: Some(Profession::Sorcerer),
            birthday: Some(BIRTHDAY_2010),
            experience: Some(0),
            banned: None,
        }
    }

    fn is_bad_request<T>(result: Result<T, Error>) -> bool {
        matches!(result, Err(Error::BadRequest(_)))
    }

    #[test]
    fn creation_defaults_banned_and_derives_level() {
        let record = validate_new_player(payload()).unwrap();
        assert!(!record.banned);
        assert_eq!(record.level, 0);
        assert_eq!(record.until_next_level, 100);
    }

    #[test]
    fn creation_requires_every_mandatory_field() {
        let missing = [
            NewPlayer { name: None, ..payload() },
            NewPlayer { title: None, ..payload() },
            NewPlayer { race: None, ..payload() },
            NewPlayer { profession: None, ..payload() },
            NewPlayer { birthday: None, ..payload() },
            NewPlayer { experience: None, ..payload() },
        ];
        for candidate in missing {
            match validate_new_player(candidate) {
                Err(Error::BadRequest(message)) => {
                    assert_eq!(message, "Please fill in all required fields")
                }
                other => panic!("expected bad request, got {other:?}"),
            }
        }
    }

    #[test]
    fn name_length_bounds() {
        for (name, ok) in [("", false), ("A", true), ("Twelve chars", true), ("Thirteen char", false)] {
            let candidate = NewPlayer {
                name: Some(name.to_owned()),
                ..payload()
            };
            assert_eq!(validate_new_player(candidate).is_ok(), ok, "name {name:?}");
        }
    }

    #[test]
    fn title_and_experience_bounds() {
        let long_title = NewPlayer {
            title: Some("x".repeat(31)),
            ..payload()
        };
        assert!(is_bad_request(validate_new_player(long_title)));

        let widest_title = NewPlayer {
            title: Some("x".repeat(30)),
            ..payload()
        };
        assert!(validate_new_player(widest_title).is_ok());

        let empty_title = NewPlayer {
            title: Some(String::new()),
            ..payload()
        };
        assert!(validate_new_player(empty_title).is_ok());

        let max = NewPlayer {
            experience: Some(10_000_000),
            ..payload()
        };
        assert!(validate_new_player(max).is_ok());

        let over = NewPlayer {
            experience: Some(10_000_001),
            ..payload()
        };
        assert!(is_bad_request(validate_new_player(over)));

        let negative = NewPlayer {
            experience: Some(-1),
            ..payload()
        };
        assert!(is_bad_request(validate_new_player(negative)));
    }

    #[test]
    fn birthday_year_must_be_in_range() {
        let early = NewPlayer {
            birthday: Some(BIRTHDAY_1999),
            ..payload()
        };
        assert!(is_bad_request(validate_new_player(early)));

        let last = NewPlayer {
            birthday: Some(BIRTHDAY_3000),
            ..payload()
        };
        assert!(validate_new_player(last).is_ok());

        let late = NewPlayer {
            birthday: Some(BIRTHDAY_3001),
            ..payload()
        };
        assert!(is_bad_request(validate_new_player(late)));

        let nonsense = NewPlayer {
            birthday: Some(i64::MAX),
            ..payload()
        };
        assert!(is_bad_request(validate_new_player(nonsense)));
    }

    #[test]
    fn patch_only_derives_when_experience_present() {
        let changes = validate_patch(PlayerPatch {
            banned: Field::Present(true),
            name: Field::Null,
            ..PlayerPatch::default()
        })
        .unwrap();
        assert_eq!(changes.banned, Some(true));
        assert_eq!(changes.name, None);
        assert_eq!(changes.level, None);

        let changes = validate_patch(PlayerPatch {
            experience: Field::Present(300),
            ..PlayerPatch::default()
        })
        .unwrap();
        assert_eq!(changes.level, Some(2));
        assert_eq!(changes.until_next_level, Some(300));
    }

    #[test]
    fn patch_checks_present_ranges() {
        let result = validate_patch(PlayerPatch {
            name: Field::Present(String::new()),
            ..PlayerPatch::default()
        });
        assert!(is_bad_request(result));

        let result = validate_patch(PlayerPatch {
            experience: Field::Present(10_000_001),
            ..PlayerPatch::default()
        });
        assert!(is_bad_request(result));

        let result = validate_patch(PlayerPatch {
            experience: Field::Present(-1),
            ..PlayerPatch::default()
        });
        assert!(is_bad_request(result));

        let result = validate_patch(PlayerPatch {
            title: Field::Present("x".repeat(31)),
            ..PlayerPatch::default()
        });
        assert!(is_bad_request(result));

        let result = validate_patch(PlayerPatch {
            birthday: Field::Present(BIRTHDAY_1999),
            ..PlayerPatch::default()
        });
        assert!(is_bad_request(result));

        let result = validate_patch(PlayerPatch {
            birthday: Field::Present(BIRTHDAY_3001),
            ..PlayerPatch::default()
        });
        assert!(is_bad_request(result));

        let changes = validate_patch(PlayerPatch {
            title: Field::Present("x".repeat(30)),
            birthday: Field::Present(BIRTHDAY_3000),
            ..PlayerPatch::default()
        })
        .unwrap();
        assert_eq!(changes.title.as_deref(), Some("x".repeat(30).as_str()));
        assert!(changes.birthday.is_some());
    }

    #[test]
    fn page_defaults_and_limits() {
        assert_eq!(page_request(None, None).unwrap(), PageRequest::default());
        assert_eq!(
            page_request(Some(2), Some(10)).unwrap(),
            PageRequest { number: 2, size: 10 }
        );
        assert!(is_bad_request(page_request(Some(-1), None)));
        assert!(is_bad_request(page_request(None, Some(0))));
        assert!(is_bad_request(page_request(None, Some(5_000))));
    }
}
