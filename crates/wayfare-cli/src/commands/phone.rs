use crate::commands::{print_json, Context};
use crate::error::invalid_input;
use anyhow::Result;
use clap::{Args, Subcommand};
use wayfare_core::domain::{format_full_phone, is_valid_phone, MAX_PHONE_DIGITS, MIN_PHONE_DIGITS};
use wayfare_core::dto::{PhoneParseDto, PhoneValidationDto};

#[derive(Debug, Subcommand)]
pub enum PhoneCommand {
    /// Split a phone value into dial code and local number
    Parse(PhoneParseArgs),
    /// Join a dial code and number into the canonical form
    Format(PhoneFormatArgs),
    /// Check that a phone value has a plausible digit count
    Validate(PhoneValidateArgs),
}

#[derive(Debug, Args)]
pub struct PhoneParseArgs {
    #[arg(allow_hyphen_values = true)]
    pub value: String,
}

#[derive(Debug, Args)]
pub struct PhoneFormatArgs {
    #[arg(allow_hyphen_values = true)]
    pub country_code: String,
    #[arg(allow_hyphen_values = true, default_value = "")]
    pub number: String,
}

#[derive(Debug, Args)]
pub struct PhoneValidateArgs {
    #[arg(allow_hyphen_values = true)]
    pub value: String,
}

pub fn parse_phone(ctx: &Context<'_>, args: PhoneParseArgs) -> Result<()> {
    let parsed = ctx.config.phone.parse(&args.value);
    let dto = PhoneParseDto::new(&args.value, parsed);

    if ctx.json {
        print_json(&dto)?;
    } else {
        println!("country code: {}", dto.country_code);
        println!("number: {}", dto.local_number);
    }
    Ok(())
}

pub fn format_phone(ctx: &Context<'_>, args: PhoneFormatArgs) -> Result<()> {
    let full = format_full_phone(args.country_code.trim(), &args.number);

    if ctx.json {
        print_json(&serde_json::json!({ "full": full }))?;
    } else {
        println!("{}", full);
    }
    Ok(())
}

pub fn validate_phone(ctx: &Context<'_>, args: PhoneValidateArgs) -> Result<()> {
    let digits = args.value.chars().filter(|ch| ch.is_ascii_digit()).count();
    let valid = is_valid_phone(&args.value);
    let dto = PhoneValidationDto {
        input: args.value,
        digits,
        valid,
    };

    if ctx.json {
        print_json(&dto)?;
    } else if valid {
        println!("valid");
    } else {
        println!("invalid");
    }

    if !valid {
        return Err(invalid_input(format!(
            "phone number must have {MIN_PHONE_DIGITS} to {MAX_PHONE_DIGITS} digits, got {digits}"
        )));
    }
    Ok(())
}
