pub mod annotations;
pub mod deck;
pub mod domain;
pub mod generation;
pub mod ordering;
pub mod ports;
pub mod theme;

pub use deck::{AddSlide, DeckService, GeneratePresentation, PresentationDetail};
pub use domain::{
    Angle, Framework, FrameworkSlide, GeneratedSlide, Idea, NewFramework, NewFrameworkSlide,
    NewPresentation, Presentation, PresentationSettings, RhetoricalFramework, Slide, SlideColors,
    SlideDraft, SlideLayout, SlideOrder, SlideType, SlideUpdate, TextAlign, VoiceProfile,
};
pub use generation::GenerationPipeline;
pub use ports::{
    ChangeNotifier, CompletionRequest, LanguageModelService, PortError, PortResult,
    PresentationStore,
};
