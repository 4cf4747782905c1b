//! OGC Filter Encoding XML.
//!
//! Wire layout:
//!
//!   <ogc:Filter xmlns:ogc="http://www.opengis.net/ogc">
//!     <ogc:And>
//!       <ogc:PropertyIsEqualTo>
//!         <ogc:PropertyName>name</ogc:PropertyName>
//!         <ogc:Literal>5</ogc:Literal>
//!       </ogc:PropertyIsEqualTo>
//!     </ogc:And>
//!   </ogc:Filter>
//!
//! Functions are `<ogc:Function name="...">` with one typed element per
//! parameter. Spatial operands are written as a placeholder GML polygon.

mod reader;
mod writer;

pub use reader::{parse, parse_literal};
pub use writer::{to_xml, write_filter};

pub const OGC_NAMESPACE: &str = "http://www.opengis.net/ogc";

/// FES 2.0 namespace, accepted on input only.
pub const FES_NAMESPACE: &str = "http://www.opengis.net/fes/2.0";
