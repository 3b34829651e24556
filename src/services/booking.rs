use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

const DATE_FORMAT: &str = "%Y-%m-%d";

static PHONE_PATTERN: OnceLock<Regex> = OnceLock::new();

fn phone_pattern() -> &'static Regex {
    PHONE_PATTERN.get_or_init(|| Regex::new(r"^[0-9-]+$").unwrap())
}

/// Raw booking form input as submitted by the client. Dates and the guest
/// count stay as strings so each field can be rejected with its own message
/// before any parsing happens.
#[derive(Debug, Clone, Default)]
pub struct BookingForm {
    pub start_date: String,
    pub end_date: String,
    pub num_guests: String,
    pub contact_phone: String,
    pub message: Option<String>,
}

/// The farm data the validation needs: the nightly price and capacity.
#[derive(Debug, Clone, Copy)]
pub struct FarmTerms {
    pub price_per_day: i64,
    pub max_guests: i64,
}

/// A validated, fully priced booking ready for submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingQuote {
    pub nights: i64,
    pub num_guests: i64,
    pub total_amount: i64,
}

/// Checks are ordered to mirror the form top to bottom; validation stops at
/// the first failure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BookingError {
    #[error("Check-in date is required")]
    CheckInRequired,

    #[error("Check-out date is required")]
    CheckOutRequired,

    #[error("Check-out date must be after check-in date")]
    CheckOutNotAfterCheckIn,

    #[error("At least one guest is required")]
    GuestCountInvalid,

    #[error("Number of guests exceeds the farm's maximum capacity")]
    GuestCountExceedsCapacity,

    #[error("Contact phone number must contain only digits and hyphens")]
    PhoneInvalid,

    #[error("Farm price is unavailable")]
    PriceUnavailable,
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

/// Count of stay-nights between two `YYYY-MM-DD` date strings.
///
/// Working on calendar dates rather than parsed local times keeps the count
/// anchored to whole UTC days, so a DST boundary or timezone offset can
/// never shift it by one. Empty or garbled input and a check-out on or
/// before check-in all yield 0; the result is never negative.
pub fn compute_nights(start_date: &str, end_date: &str) -> i64 {
    if start_date.is_empty() || end_date.is_empty() {
        return 0;
    }

    let (Some(start), Some(end)) = (parse_date(start_date), parse_date(end_date)) else {
        return 0;
    };

    end.signed_duration_since(start).num_days().max(0)
}

/// Total stay price: price per day × guests × nights. Zero whenever any
/// factor is non-positive.
pub fn compute_total_price(price_per_day: i64, num_guests: i64, nights: i64) -> i64 {
    if price_per_day <= 0 || num_guests <= 0 || nights <= 0 {
        return 0;
    }

    price_per_day * num_guests * nights
}

/// Validates a booking form against the farm's terms and prices it.
///
/// Pure and cheap enough to re-run on every input change for a live price
/// preview; nothing is mutated on failure.
pub fn validate(form: &BookingForm, farm: &FarmTerms) -> Result<BookingQuote, BookingError> {
    if form.start_date.is_empty() {
        return Err(BookingError::CheckInRequired);
    }

    if form.end_date.is_empty() {
        return Err(BookingError::CheckOutRequired);
    }

    let nights = compute_nights(&form.start_date, &form.end_date);
    if nights <= 0 {
        return Err(BookingError::CheckOutNotAfterCheckIn);
    }

    let num_guests = form
        .num_guests
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|n| *n >= 1)
        .ok_or(BookingError::GuestCountInvalid)?;

    if num_guests > farm.max_guests {
        return Err(BookingError::GuestCountExceedsCapacity);
    }

    if form.contact_phone.is_empty() || !phone_pattern().is_match(&form.contact_phone) {
        return Err(BookingError::PhoneInvalid);
    }

    if farm.price_per_day <= 0 {
        return Err(BookingError::PriceUnavailable);
    }

    Ok(BookingQuote {
        nights,
        num_guests,
        total_amount: compute_total_price(farm.price_per_day, num_guests, nights),
    })
}
