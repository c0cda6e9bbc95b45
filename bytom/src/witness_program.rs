use bech32::{u5, ToBase32};
use failure::Fail;
use std::str::FromStr;
use vanity_model::address::AddressError;

#[derive(Debug, Fail, PartialEq, Eq)]
pub enum WitnessProgramError {
    #[fail(display = "invalid program length {}", _0)]
    InvalidProgramLength(usize),

    #[fail(display = "invalid program length {} for script version {}", _0, _1)]
    InvalidProgramLengthForVersion(usize, u8),

    #[fail(display = "invalid version {}", _0)]
    InvalidVersion(u8),

    #[fail(
        display = "invalid program length: {{ expected: {:?}, found: {:?} }}",
        _0, _1
    )]
    MismatchedProgramLength(usize, usize),

    #[fail(display = "error decoding program from hex string")]
    ProgramDecodingError,
}

impl From<WitnessProgramError> for AddressError {
    fn from(value: WitnessProgramError) -> Self {
        AddressError::Crate("WitnessProgram", format!("{:?}", value))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WitnessProgram {
    pub version: u8,
    pub program: Vec<u8>,
}

impl WitnessProgram {
    /// Parses a serialized control program: version, push length, program.
    pub fn new(program: &[u8]) -> Result<Self, WitnessProgramError> {
        if program.len() < 2 {
            return Err(WitnessProgramError::InvalidProgramLength(program.len()));
        }
        let data_size = program[1] as usize;
        let data = program[2..].to_vec();

        if data_size != data.len() {
            return Err(WitnessProgramError::MismatchedProgramLength(
                data.len(),
                data_size,
            ));
        }

        let program = Self {
            version: program[0],
            program: data,
        };

        program.validate()?;
        Ok(program)
    }

    /// Version 0 pay-to-witness-public-key-hash program.
    pub fn p2wpkh(key_hash: &[u8; 20]) -> Self {
        Self {
            version: 0,
            program: key_hash.to_vec(),
        }
    }

    /// Only witness version 0 is defined, carrying either a 20-byte key
    /// hash or a 32-byte script hash.
    pub fn validate(&self) -> Result<(), WitnessProgramError> {
        if self.version != 0 {
            return Err(WitnessProgramError::InvalidVersion(self.version));
        }
        match self.program.len() {
            20 | 32 => Ok(()),
            length => Err(WitnessProgramError::InvalidProgramLengthForVersion(
                length,
                self.version,
            )),
        }
    }

    /// Serializes as a control program: `OP_0`, the push length, the hash.
    pub fn to_control_program(&self) -> Vec<u8> {
        let mut output = Vec::with_capacity(self.program.len() + 2);
        output.push(self.version);
        output.push(self.program.len() as u8);
        output.extend_from_slice(&self.program);
        output
    }

    /// The bech32 data part: the version as one 5-bit group, then the program
    /// regrouped from 8-bit to 5-bit values.
    pub fn to_base32(&self) -> Result<Vec<u5>, WitnessProgramError> {
        self.validate()?;
        let version = u5::try_from_u8(self.version)
            .map_err(|_| WitnessProgramError::InvalidVersion(self.version))?;

        let mut data = vec![version];
        data.extend_from_slice(&self.program.to_base32());
        Ok(data)
    }
}

impl FromStr for WitnessProgram {
    type Err = WitnessProgramError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WitnessProgram::new(&match hex::decode(s) {
            Ok(bytes) => bytes,
            Err(_) => return Err(WitnessProgramError::ProgramDecodingError),
        })
    }
}
