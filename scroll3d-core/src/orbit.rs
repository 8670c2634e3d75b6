/// Camera orbit descriptors of the form `"45deg 75deg 105%"`
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{multispace0, multispace1},
    combinator::{all_consuming, map, value},
    number::complete::double,
    sequence::{delimited, pair, tuple},
    IResult,
};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AngleUnit {
    Deg,
    Rad,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Angle {
    pub value: f64,
    pub unit: AngleUnit,
}

impl Angle {
    pub fn deg(value: f64) -> Self {
        Self {
            value,
            unit: AngleUnit::Deg,
        }
    }

    pub fn to_degrees(&self) -> f64 {
        match self.unit {
            AngleUnit::Deg => self.value,
            AngleUnit::Rad => self.value.to_degrees(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LengthUnit {
    Percent,
    Meters,
    Centimeters,
    Millimeters,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Radius {
    pub value: f64,
    pub unit: LengthUnit,
}

/// Camera position around the model: azimuth (theta), polar angle (phi) and distance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraOrbit {
    pub theta: Angle,
    pub phi: Angle,
    pub radius: Radius,
}

impl CameraOrbit {
    pub fn parse(input: &str) -> Result<Self, String> {
        match all_consuming(delimited(multispace0, parse_orbit, multispace0))(input) {
            Ok((_, orbit)) => Ok(orbit),
            Err(e) => Err(format!("invalid camera orbit {:?}: {:?}", input, e)),
        }
    }
}

impl fmt::Display for CameraOrbit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.theta, self.phi, self.radius)
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self.unit {
            AngleUnit::Deg => "deg",
            AngleUnit::Rad => "rad",
        };
        write!(f, "{}{}", self.value, unit)
    }
}

impl fmt::Display for Radius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self.unit {
            LengthUnit::Percent => "%",
            LengthUnit::Meters => "m",
            LengthUnit::Centimeters => "cm",
            LengthUnit::Millimeters => "mm",
        };
        write!(f, "{}{}", self.value, unit)
    }
}

fn parse_orbit(input: &str) -> IResult<&str, CameraOrbit> {
    let (input, (theta, _, phi, _, radius)) =
        tuple((parse_angle, multispace1, parse_angle, multispace1, parse_radius))(input)?;
    Ok((input, CameraOrbit { theta, phi, radius }))
}

fn parse_angle(input: &str) -> IResult<&str, Angle> {
    map(
        pair(
            double,
            alt((
                value(AngleUnit::Deg, tag("deg")),
                value(AngleUnit::Rad, tag("rad")),
            )),
        ),
        |(value, unit)| Angle { value, unit },
    )(input)
}

fn parse_radius(input: &str) -> IResult<&str, Radius> {
    // "mm" before "m" so the longer unit wins
    map(
        pair(
            double,
            alt((
                value(LengthUnit::Percent, tag("%")),
                value(LengthUnit::Millimeters, tag("mm")),
                value(LengthUnit::Centimeters, tag("cm")),
                value(LengthUnit::Meters, tag("m")),
            )),
        ),
        |(value, unit)| Radius { value, unit },
    )(input)
}
