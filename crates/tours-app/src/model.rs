// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use url::Url;

use crate::ids::TourId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TourRecord {
    pub id: TourId,
    pub image: String,
    pub name: String,
    pub price: String,
    pub info: String,
}

impl TourRecord {
    pub fn validate(&self) -> Result<()> {
        if self.id.as_str().trim().is_empty() {
            bail!("tour id must not be empty");
        }
        if self.name.trim().is_empty() {
            bail!("tour {} has an empty name", self.id);
        }
        if parse_decimal(&self.price).is_none() {
            bail!(
                "tour {} has price {:?}; expected a non-negative number like 1995, 1,995 or 2499.50",
                self.id,
                self.price
            );
        }
        match Url::parse(&self.image) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => bail!(
                "tour {} image uses unsupported scheme {:?}; expected http or https",
                self.id,
                url.scheme()
            ),
            Err(error) => bail!(
                "tour {} image {:?} is not an absolute URL ({error})",
                self.id,
                self.image
            ),
        }
        Ok(())
    }
}

pub fn validate_unique_ids(tours: &[TourRecord]) -> Result<()> {
    let mut seen = BTreeSet::new();
    for tour in tours {
        if !seen.insert(tour.id.as_str()) {
            bail!("duplicate tour id {}; ids must be unique", tour.id);
        }
    }
    Ok(())
}

pub fn format_price(raw: &str) -> String {
    let Some((whole, fraction)) = parse_decimal(raw) else {
        return format!("${raw}");
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match fraction {
        Some(fraction) if fraction.len() < 2 => format!("${grouped}.{fraction:0<2}"),
        Some(fraction) => format!("${grouped}.{fraction}"),
        None => format!("${grouped}"),
    }
}

/// Splits a price into its whole digits and optional fraction. The whole
/// part may use comma thousands separators ("1,995"); they are stripped from
/// the returned digits.
fn parse_decimal(raw: &str) -> Option<(String, Option<&str>)> {
    let trimmed = raw.trim();
    let (whole, fraction) = match trimmed.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (trimmed, None),
    };
    if let Some(fraction) = fraction
        && (fraction.is_empty() || !fraction.bytes().all(|byte| byte.is_ascii_digit()))
    {
        return None;
    }
    Some((parse_whole(whole)?, fraction))
}

fn parse_whole(whole: &str) -> Option<String> {
    let all_digits = |group: &str| group.bytes().all(|byte| byte.is_ascii_digit());
    if !whole.contains(',') {
        return (!whole.is_empty() && all_digits(whole)).then(|| whole.to_owned());
    }

    let mut groups = whole.split(',');
    let lead = groups.next()?;
    if !(1..=3).contains(&lead.len()) || !all_digits(lead) {
        return None;
    }
    let mut digits = lead.to_owned();
    for group in groups {
        if group.len() != 3 || !all_digits(group) {
            return None;
        }
        digits.push_str(group);
    }
    Some(digits)
}
