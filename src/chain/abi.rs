// Solidity bindings for the petition registry and the ERC-20 token it burns.

use alloy_sol_types::sol;

sol! {
    /// Record returned by `getPetition`.
    #[derive(Debug, PartialEq, Eq)]
    struct PetitionData {
        string title;
        string description;
        uint256 supportCount;
        uint256 goal;
        uint256 createdAt;
    }

    /// Token and amount covered by a Permit2 signature transfer.
    #[derive(Debug, PartialEq, Eq)]
    struct TokenPermissions {
        address token;
        uint256 amount;
    }

    /// Permit2 `PermitTransferFrom` as the registry receives it. The spender is
    /// implied by the calling contract and is not part of the struct.
    #[derive(Debug, PartialEq, Eq)]
    struct PermitTransferFrom {
        TokenPermissions permitted;
        uint256 nonce;
        uint256 deadline;
    }

    interface IPetitionRegistry {
        function petitionCount() external view returns (uint256);
        function getPetition(uint256 petitionId) external view returns (PetitionData memory);
        function getLastPetitionId() external view returns (uint256);
        function burnAmount() external view returns (uint256);
        function rvzTokenAddress() external view returns (address);
        function permit2Address() external view returns (address);
        function createPetitionWithPermit2(
            string title,
            string description,
            uint256 goal,
            PermitTransferFrom permit,
            bytes signature
        ) external;
        function supportPetition(
            uint256 petitionId,
            uint256 root,
            uint256 nullifierHash,
            uint256[8] proof
        ) external;
    }

    interface IERC20 {
        function balanceOf(address account) external view returns (uint256);
        function decimals() external view returns (uint8);
    }
}
