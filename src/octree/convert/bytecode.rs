use crate::octree::packed::PackedOctree;
use bendy::{
    decoding::{FromBencode, Object},
    encoding::{Error as BencodeError, SingleItemEncoder, ToBencode},
};
use std::io::{Error as IoError, ErrorKind};

///####################################################################################
/// PackedOctree
///####################################################################################
/// Floats are stored by their bit pattern, so the buffer is restored exactly
impl ToBencode for PackedOctree {
    const MAX_DEPTH: usize = 2;

    fn encode(&self, encoder: SingleItemEncoder) -> Result<(), BencodeError> {
        encoder.emit_list(|e| {
            e.emit_int(self.overflowed as u8)?;
            for value in &self.data {
                e.emit_int(value.to_bits())?;
            }
            Ok(())
        })
    }
}

impl FromBencode for PackedOctree {
    fn decode_bencode_object(data: Object) -> Result<Self, bendy::decoding::Error> {
        match data {
            Object::List(mut list) => {
                let overflowed = match list.next_object()? {
                    Some(Object::Integer("0")) => Ok(false),
                    Some(Object::Integer("1")) => Ok(true),
                    Some(Object::Integer(i)) => Err(bendy::decoding::Error::unexpected_token(
                        "boolean field overflowed",
                        format!("the number: {}", i),
                    )),
                    _ => Err(bendy::decoding::Error::unexpected_token(
                        "boolean field overflowed",
                        "Something else",
                    )),
                }?;

                let mut values = Vec::new();
                while let Some(object) = list.next_object()? {
                    match object {
                        Object::Integer(i) => {
                            let bits = i.parse::<u32>().map_err(|_| {
                                bendy::decoding::Error::unexpected_token(
                                    "bit pattern of a 32 bit float",
                                    format!("the number: {}", i),
                                )
                            })?;
                            values.push(f32::from_bits(bits));
                        }
                        _ => {
                            return Err(bendy::decoding::Error::unexpected_token(
                                "bit pattern of a 32 bit float",
                                "Something else",
                            ))
                        }
                    }
                }

                let mut packed = PackedOctree::from_raw(values).map_err(|error| {
                    bendy::decoding::Error::unexpected_token(
                        "a valid packed octree",
                        format!("{:?}", error),
                    )
                })?;
                packed.overflowed = overflowed;
                Ok(packed)
            }
            _ => Err(bendy::decoding::Error::unexpected_token("List", "not List")),
        }
    }
}

impl PackedOctree {
    /// converts the data structure to a byte representation
    pub fn to_bytes(&self) -> Result<Vec<u8>, BencodeError> {
        self.to_bencode()
    }

    /// parses the data structure from a byte string
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bendy::decoding::Error> {
        Self::from_bencode(bytes)
    }

    /// saves the data structure to the given file path
    pub fn save(&self, path: &str) -> Result<(), IoError> {
        use std::fs::File;
        use std::io::Write;
        let bytes = self
            .to_bytes()
            .map_err(|error| IoError::new(ErrorKind::InvalidData, format!("{:?}", error)))?;
        let mut file = File::create(path)?;
        file.write_all(&bytes)?;
        Ok(())
    }

    /// loads the data structure from the given file path
    pub fn load(path: &str) -> Result<Self, IoError> {
        use std::fs::File;
        use std::io::Read;
        let mut file = File::open(path)?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        Self::from_bytes(&bytes)
            .map_err(|error| IoError::new(ErrorKind::InvalidData, format!("{:?}", error)))
    }
}
