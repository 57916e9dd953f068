// Syllable templates: CV-skeleton parsing and onset/nucleus/coda structure.
//
// A `Syllable` owns three ordered sound sequences plus a sibling mora
// counter for syllable weight — weight is composed alongside the sounds,
// not inherited from them. Template parsing follows the nucleus-run rule:
// the vowel markers of a template must form one contiguous run, which
// becomes the nucleus; the leading and trailing remainders become onset and
// coda. Templates implying two separate nuclei are rejected outright
// rather than mis-split.
//
// Derived orderings (`body`, `rhyme`, `sounds`) preserve template order.
//
// See also: `sounds.rs` for the `Sound` values each marker expands to.

use crate::error::PhonologyError;
use crate::schema::PhonologySchema;
use crate::sounds::{Sound, SoundKind};
use phonoloom_prng::LoomRng;
use serde::{Deserialize, Serialize};

/// An ordered composite of onset, nucleus, and coda sounds with a mora
/// weight counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Syllable {
    onset: Vec<Sound>,
    nucleus: Vec<Sound>,
    coda: Vec<Sound>,
    weight: u32,
}

impl Syllable {
    /// Parse a CV-template string (markers `c`/`v`, case-insensitive).
    ///
    /// The template's vowel markers must form a single contiguous run:
    /// that run is the nucleus, everything before it the onset, everything
    /// after it the coda. Errors: `UnexpectedMarker` for any character
    /// other than `c`/`v`, `NoNucleusFound` when there is no vowel marker,
    /// `DisjointNuclei` when the vowel markers split into separate groups.
    pub fn parse(schema: &PhonologySchema, template: &str) -> Result<Self, PhonologyError> {
        let template = template.to_lowercase();
        validate_markers(&template)?;

        let vowel_count = template.chars().filter(|&c| c == 'v').count();
        if vowel_count == 0 {
            return Err(PhonologyError::NoNucleusFound);
        }
        let run = "v".repeat(vowel_count);
        let Some(at) = template.find(&run) else {
            return Err(PhonologyError::DisjointNuclei(template));
        };

        Ok(Self::assemble(
            schema,
            &template[..at],
            &run,
            &template[at + vowel_count..],
        ))
    }

    /// Build a syllable from explicit onset/nucleus/coda marker strings.
    ///
    /// An empty nucleus string defaults to `"v"`; a consonantal nucleus is
    /// expressed explicitly as `nucleus = "c"`. Markers are validated the
    /// same way as in `parse`.
    pub fn from_parts(
        schema: &PhonologySchema,
        onset: &str,
        nucleus: &str,
        coda: &str,
    ) -> Result<Self, PhonologyError> {
        let onset = onset.to_lowercase();
        let nucleus = nucleus.to_lowercase();
        let coda = coda.to_lowercase();
        for part in [&onset, &nucleus, &coda] {
            validate_markers(part)?;
        }
        let nucleus = if nucleus.is_empty() {
            "v".to_string()
        } else {
            nucleus
        };
        Ok(Self::assemble(schema, &onset, &nucleus, &coda))
    }

    /// Expand validated marker strings into sound sequences.
    fn assemble(schema: &PhonologySchema, onset: &str, nucleus: &str, coda: &str) -> Self {
        let expand = |markers: &str| -> Vec<Sound> {
            markers
                .chars()
                .map(|m| {
                    let kind = SoundKind::from_marker(m).expect("markers validated");
                    Sound::new(schema, kind)
                })
                .collect()
        };
        Self {
            onset: expand(onset),
            nucleus: expand(nucleus),
            coda: expand(coda),
            weight: 1,
        }
    }

    pub fn onset(&self) -> &[Sound] {
        &self.onset
    }

    pub fn nucleus(&self) -> &[Sound] {
        &self.nucleus
    }

    pub fn coda(&self) -> &[Sound] {
        &self.coda
    }

    /// Onset followed by nucleus, in template order.
    pub fn body(&self) -> Vec<&Sound> {
        self.onset.iter().chain(&self.nucleus).collect()
    }

    /// Nucleus followed by coda, in template order.
    pub fn rhyme(&self) -> Vec<&Sound> {
        self.nucleus.iter().chain(&self.coda).collect()
    }

    /// The full sound sequence: onset, nucleus, coda.
    pub fn sounds(&self) -> Vec<&Sound> {
        self.onset
            .iter()
            .chain(&self.nucleus)
            .chain(&self.coda)
            .collect()
    }

    /// Render the CV skeleton back as a marker string.
    pub fn pattern(&self) -> String {
        self.sounds().iter().map(|s| s.kind().marker()).collect()
    }

    /// Current mora weight.
    pub fn weight(&self) -> u32 {
        self.weight
    }

    /// Add one mora.
    pub fn add_mora(&mut self) {
        self.weight += 1;
    }

    /// Remove one mora; weight floors at zero.
    pub fn remove_mora(&mut self) {
        self.weight = self.weight.saturating_sub(1);
    }

    /// Re-roll every position with a random sound of the same kind.
    pub fn randomize(&mut self, schema: &PhonologySchema, rng: &mut LoomRng) {
        for sound in self
            .onset
            .iter_mut()
            .chain(&mut self.nucleus)
            .chain(&mut self.coda)
        {
            *sound = Sound::random(schema, sound.kind(), rng);
        }
    }
}

/// Check that every character of a marker string is a recognized CV marker.
fn validate_markers(markers: &str) -> Result<(), PhonologyError> {
    for marker in markers.chars() {
        if SoundKind::from_marker(marker).is_none() {
            return Err(PhonologyError::UnexpectedMarker(marker));
        }
    }
    Ok(())
}
